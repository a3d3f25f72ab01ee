//! Shared fixtures for the engine's unit tests.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lumen_common::{Config, ManualClock};
use lumen_input::{HeadlessHandle, HeadlessWindow};
use lumen_kernel::World;
use lumen_render::{DebugTextRenderer, Renderer};

use crate::game::Game;
use crate::hooks::{GameHooks, HookResult};
use crate::map::{MapError, MapLoader};

/// Logs every hook call; fails the one named in `fail_on`.
#[derive(Debug, Default)]
pub(crate) struct RecordingHooks {
    pub(crate) log: Rc<RefCell<Vec<String>>>,
    pub(crate) fail_on: Option<&'static str>,
}

impl RecordingHooks {
    fn record(&mut self, name: &'static str, world: Option<&World>) -> HookResult {
        let entry = match world {
            Some(world) => format!("{name}:{}", world.label()),
            None => name.to_string(),
        };
        self.log.borrow_mut().push(entry);
        if self.fail_on == Some(name) {
            anyhow::bail!("{name} refused");
        }
        Ok(())
    }
}

impl GameHooks for RecordingHooks {
    fn init_hook(&mut self) -> HookResult {
        self.record("init", None)
    }

    fn custom_trigger_hook(&mut self) -> HookResult {
        self.record("custom_trigger", None)
    }

    fn post_setup(&mut self) -> HookResult {
        self.record("post_setup", None)
    }

    fn remove_hook(&mut self) -> HookResult {
        self.record("remove", None)
    }

    fn on_pre_create_world(&mut self, world: &mut World) -> HookResult {
        self.record("pre_create", Some(world))
    }

    fn on_post_create_world(&mut self, world: &mut World) -> HookResult {
        self.record("post_create", Some(world))
    }

    fn on_pre_start_world(&mut self, world: &mut World) -> HookResult {
        self.record("pre_start", Some(world))
    }

    fn on_post_start_world(&mut self, world: &mut World) -> HookResult {
        self.record("post_start", Some(world))
    }

    fn on_pre_stop_world(&mut self, world: &mut World) -> HookResult {
        self.record("pre_stop", Some(world))
    }

    fn on_post_stop_world(&mut self, world: &mut World) -> HookResult {
        self.record("post_stop", Some(world))
    }

    fn on_pre_destroy_world(&mut self, world: &mut World) -> HookResult {
        self.record("pre_destroy", Some(world))
    }

    fn on_post_destroy_world(&mut self, world: &mut World) -> HookResult {
        self.record("post_destroy", Some(world))
    }
}

/// Records requested map paths instead of reading files.
#[derive(Debug, Default)]
pub(crate) struct RecordingMapLoader {
    pub(crate) loaded: Rc<RefCell<Vec<PathBuf>>>,
    pub(crate) fail: Rc<Cell<bool>>,
}

impl MapLoader for RecordingMapLoader {
    fn load(&mut self, _world: &mut World, path: &Path) -> Result<(), MapError> {
        if self.fail.get() {
            return Err(MapError::Invalid {
                path: path.to_path_buf(),
                reason: "rejected".into(),
            });
        }
        self.loaded.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// A game wired to a headless window, a manual clock and recording hooks,
/// plus the handles needed to observe them.
pub(crate) struct TestRig {
    pub(crate) game: Game<RecordingHooks>,
    pub(crate) window: HeadlessHandle,
    pub(crate) clock: ManualClock,
    pub(crate) renderers_built: Rc<Cell<usize>>,
    log: Rc<RefCell<Vec<String>>>,
    maps: Rc<RefCell<Vec<PathBuf>>>,
    map_fail: Rc<Cell<bool>>,
}

impl TestRig {
    pub(crate) fn new(config: Config) -> Self {
        Self::with_hooks(config, None)
    }

    pub(crate) fn failing_on(config: Config, hook: &'static str) -> Self {
        Self::with_hooks(config, Some(hook))
    }

    fn with_hooks(config: Config, fail_on: Option<&'static str>) -> Self {
        let hooks = RecordingHooks {
            fail_on,
            ..RecordingHooks::default()
        };
        let log = Rc::clone(&hooks.log);
        let loader = RecordingMapLoader::default();
        let maps = Rc::clone(&loader.loaded);
        let map_fail = Rc::clone(&loader.fail);
        let window = HeadlessWindow::new(640, 480);
        let handle = window.handle();
        let clock = ManualClock::new(0);
        let renderers_built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renderers_built);

        let game = Game::builder(config)
            .hooks(hooks)
            .window(window)
            .clock(clock.clone())
            .map_loader(loader)
            .renderer(move || {
                counter.set(counter.get() + 1);
                Box::new(DebugTextRenderer::new()) as Box<dyn Renderer>
            })
            .build();

        Self {
            game,
            window: handle,
            clock,
            renderers_built,
            log,
            maps,
            map_fail,
        }
    }

    pub(crate) fn started(config: Config) -> Self {
        let mut rig = Self::new(config);
        rig.game.setup().unwrap();
        rig.clear_log();
        rig
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub(crate) fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    pub(crate) fn maps(&self) -> Vec<PathBuf> {
        self.maps.borrow().clone()
    }

    pub(crate) fn fail_maps(&self) {
        self.map_fail.set(true);
    }
}
