use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use lumen_common::{Clock, Config, MonotonicClock};
use lumen_input::{ActionMap, HeadlessWindow, InputManager, Window};
use lumen_kernel::{ObserverId, World};
use lumen_render::{DebugTextRenderer, Overlay, Renderer, Screen, ScreenQueue};

use crate::audio::AudioListener;
use crate::deferred::DeferredQueue;
use crate::error::EngineError;
use crate::hooks::{GameHooks, NoHooks, hook};
use crate::map::{DEFAULT_MAP, MapLoader, YamlMapLoader, resolve_map_path};
use crate::registry::WorldRegistry;
use crate::timing::{Fps, FrameTiming};

/// Builds a fresh renderer each time a world is installed.
pub type RendererFactory = Box<dyn FnMut() -> Box<dyn Renderer>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Close was requested; the loop exits at the top of the next cycle.
    CloseRequested,
    /// Teardown has run.
    Closed,
}

/// Set by the active world's key observer, consumed at the end of the
/// next event poll.
#[derive(Debug, Default)]
pub(crate) struct ScreenshotTrigger {
    pub(crate) requested: Rc<Cell<bool>>,
    pub(crate) observer: Option<ObserverId>,
}

/// Top-level controller: owns the window, the active world, the registry
/// of other worlds and the deferred queue, and drives the game cycle.
///
/// Everything runs on the thread that owns the `Game`.
pub struct Game<H: GameHooks = NoHooks> {
    pub(crate) config: Rc<Config>,
    pub(crate) hooks: H,
    pub(crate) window: Box<dyn Window>,
    pub(crate) renderer_factory: RendererFactory,
    pub(crate) renderer: Option<Box<dyn Renderer>>,
    pub(crate) overlay: Option<Box<dyn Overlay>>,
    pub(crate) audio: Option<Box<dyn AudioListener>>,
    pub(crate) map_loader: Box<dyn MapLoader>,
    pub(crate) default_map: String,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) input: InputManager,
    pub(crate) world: Option<World>,
    pub(crate) other_worlds: WorldRegistry,
    pub(crate) deferred: DeferredQueue,
    pub(crate) screens: ScreenQueue,
    pub(crate) timing: FrameTiming,
    pub(crate) fps: Fps,
    pub(crate) state: LoopState,
    pub(crate) screenshot: ScreenshotTrigger,
}

impl Game<NoHooks> {
    pub fn builder(config: Config) -> GameBuilder<NoHooks> {
        GameBuilder::new(config)
    }
}

impl<H: GameHooks> Game<H> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// The active world, if any.
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn other_worlds(&self) -> &WorldRegistry {
        &self.other_worlds
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// A handle to the post-cycle queue that can be moved into observers
    /// and simulations.
    pub fn deferrer(&self) -> DeferredQueue {
        self.deferred.clone()
    }

    /// Run `callback` after the current cycle has rendered.
    pub fn defer_post_cycle(&self, callback: impl FnOnce() + 'static) {
        self.deferred.defer(callback);
    }

    /// Show `screen` for the next rendered frame only.
    pub fn queue_screen(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    /// Create the window, build the first world from the configured map and
    /// make it active.
    pub fn setup(&mut self) -> Result<(), EngineError> {
        let _span = tracing::info_span!("setup").entered();
        self.create_window()?;
        hook("init_hook", self.hooks.init_hook())?;
        hook("custom_trigger_hook", self.hooks.custom_trigger_hook())?;

        let mut world = World::named("main");
        self.create_world(&mut world)?;
        self.timing.reset();
        self.load_map(&mut world)?;
        self.set_world(Some(world))?;

        hook("post_setup", self.hooks.post_setup())?;
        tracing::info!("setup complete");
        Ok(())
    }

    fn create_window(&mut self) -> Result<(), EngineError> {
        self.window.create(&self.config.window.title)?;
        if self.config.cursor_visible {
            self.window.unlock_mouse();
        } else {
            self.window.lock_mouse();
        }
        Ok(())
    }

    /// Populate `world` from the map the configuration selects.
    pub fn load_map(&mut self, world: &mut World) -> Result<(), EngineError> {
        let path = resolve_map_path(&self.config, &self.default_map);
        self.load_map_from(world, &path)
    }

    pub fn load_map_from(&mut self, world: &mut World, path: &Path) -> Result<(), EngineError> {
        tracing::info!(world = world.label(), path = %path.display(), "loading map");
        self.map_loader.load(world, path)?;
        Ok(())
    }

    /// Create a world labelled `label` and load `path` into it, ready to be
    /// stashed or made active.
    pub fn build_world(&mut self, label: &str, path: &Path) -> Result<World, EngineError> {
        let mut world = World::named(label);
        self.create_world(&mut world)?;
        self.load_map_from(&mut world, path)?;
        Ok(world)
    }
}

/// Assembles a [`Game`]. Every collaborator has a headless default.
pub struct GameBuilder<H: GameHooks = NoHooks> {
    config: Config,
    hooks: H,
    window: Option<Box<dyn Window>>,
    renderer_factory: Option<RendererFactory>,
    overlay: Option<Box<dyn Overlay>>,
    audio: Option<Box<dyn AudioListener>>,
    map_loader: Option<Box<dyn MapLoader>>,
    default_map: String,
    clock: Option<Box<dyn Clock>>,
    action_map: ActionMap,
}

impl GameBuilder<NoHooks> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            hooks: NoHooks,
            window: None,
            renderer_factory: None,
            overlay: None,
            audio: None,
            map_loader: None,
            default_map: DEFAULT_MAP.to_string(),
            clock: None,
            action_map: ActionMap::default(),
        }
    }
}

impl<H: GameHooks> GameBuilder<H> {
    pub fn hooks<H2: GameHooks>(self, hooks: H2) -> GameBuilder<H2> {
        GameBuilder {
            config: self.config,
            hooks,
            window: self.window,
            renderer_factory: self.renderer_factory,
            overlay: self.overlay,
            audio: self.audio,
            map_loader: self.map_loader,
            default_map: self.default_map,
            clock: self.clock,
            action_map: self.action_map,
        }
    }

    pub fn window(mut self, window: impl Window + 'static) -> Self {
        self.window = Some(Box::new(window));
        self
    }

    pub fn renderer(mut self, factory: impl FnMut() -> Box<dyn Renderer> + 'static) -> Self {
        self.renderer_factory = Some(Box::new(factory));
        self
    }

    pub fn overlay(mut self, overlay: impl Overlay + 'static) -> Self {
        self.overlay = Some(Box::new(overlay));
        self
    }

    pub fn audio(mut self, audio: impl AudioListener + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn map_loader(mut self, loader: impl MapLoader + 'static) -> Self {
        self.map_loader = Some(Box::new(loader));
        self
    }

    /// Map used when the configuration names none, relative to the data
    /// directory.
    pub fn default_map(mut self, map: impl Into<String>) -> Self {
        self.default_map = map.into();
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn action_map(mut self, map: ActionMap) -> Self {
        self.action_map = map;
        self
    }

    pub fn build(self) -> Game<H> {
        let window = self.window.unwrap_or_else(|| {
            Box::new(HeadlessWindow::new(
                self.config.window.width,
                self.config.window.height,
            ))
        });
        let renderer_factory = self.renderer_factory.unwrap_or_else(|| {
            Box::new(|| Box::new(DebugTextRenderer::new()) as Box<dyn Renderer>)
        });
        if self.config.profiler_enabled {
            tracing::info!("profiler enabled");
        }

        Game {
            config: Rc::new(self.config),
            hooks: self.hooks,
            window,
            renderer_factory,
            renderer: None,
            overlay: self.overlay,
            audio: self.audio,
            map_loader: self
                .map_loader
                .unwrap_or_else(|| Box::new(YamlMapLoader::new())),
            default_map: self.default_map,
            clock: self
                .clock
                .unwrap_or_else(|| Box::new(MonotonicClock::new())),
            input: InputManager::new(self.action_map),
            world: None,
            other_worlds: WorldRegistry::new(),
            deferred: DeferredQueue::new(),
            screens: ScreenQueue::new(),
            timing: FrameTiming::default(),
            fps: Fps::default(),
            state: LoopState::Running,
            screenshot: ScreenshotTrigger::default(),
        }
    }
}

impl<H: GameHooks> std::fmt::Debug for Game<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("world", &self.world)
            .field("other_worlds", &self.other_worlds.names())
            .field("deferred", &self.deferred)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingHooks, TestRig};
    use lumen_kernel::WorldState;

    #[test]
    fn setup_runs_hooks_in_order_and_starts_main_world() {
        let mut rig = TestRig::new(Config::default());
        rig.game.setup().unwrap();

        let world = rig.game.world().unwrap();
        assert_eq!(world.label(), "main");
        assert_eq!(world.state(), WorldState::Started);
        assert_eq!(world.simulations.names(), vec!["player", "physics"]);
        assert_eq!(
            rig.log(),
            vec![
                "init",
                "custom_trigger",
                "pre_create:main",
                "post_create:main",
                "pre_start:main",
                "post_start:main",
                "post_setup",
            ]
        );
        assert_eq!(rig.window.title().as_deref(), Some("Lumen"));
    }

    #[test]
    fn setup_loads_configured_map_name_from_data_dir() {
        let config = Config {
            map: Some("arena.yaml".into()),
            map_path: Some("/ignored.yaml".into()),
            data_dir: "game-data".into(),
            ..Config::default()
        };
        let mut rig = TestRig::new(config);
        rig.game.setup().unwrap();
        assert_eq!(rig.maps(), vec![std::path::PathBuf::from("game-data/arena.yaml")]);
    }

    #[test]
    fn setup_uses_map_path_verbatim() {
        let config = Config {
            map_path: Some("/srv/level.yaml".into()),
            ..Config::default()
        };
        let mut rig = TestRig::new(config);
        rig.game.setup().unwrap();
        assert_eq!(rig.maps(), vec![std::path::PathBuf::from("/srv/level.yaml")]);
    }

    #[test]
    fn setup_falls_back_to_default_map() {
        let mut rig = TestRig::new(Config::default());
        rig.game.setup().unwrap();
        assert_eq!(rig.maps(), vec![std::path::PathBuf::from("data/maps/default.yaml")]);
    }

    #[test]
    fn setup_locks_cursor_unless_visible() {
        let mut hidden = TestRig::new(Config::default());
        hidden.game.setup().unwrap();
        assert!(hidden.window.mouse_locked());

        let mut visible = TestRig::new(Config {
            cursor_visible: true,
            ..Config::default()
        });
        visible.game.setup().unwrap();
        assert!(!visible.window.mouse_locked());
    }

    #[test]
    fn map_failure_aborts_setup_before_world_is_active() {
        let mut rig = TestRig::new(Config::default());
        rig.fail_maps();
        let err = rig.game.setup().unwrap_err();
        assert!(matches!(err, EngineError::Map(_)));
        assert!(rig.game.world().is_none());
        assert!(!rig.log().contains(&"post_setup".to_string()));
    }

    #[test]
    fn world_shares_game_config() {
        let mut rig = TestRig::new(Config {
            console_enabled: true,
            ..Config::default()
        });
        rig.game.setup().unwrap();
        assert!(rig.game.world().unwrap().config().unwrap().console_enabled);
    }

    #[test]
    fn built_world_can_be_stashed_and_switched_to() {
        let mut rig = TestRig::started(Config::default());
        let arena = rig
            .game
            .build_world("arena", std::path::Path::new("maps/arena.yaml"))
            .unwrap();
        assert_eq!(arena.state(), WorldState::Created);
        rig.game.stash_world("arena", arena).unwrap();

        rig.game.switch_to_other_world("arena").unwrap();
        assert_eq!(rig.game.world().unwrap().label(), "arena");
        assert_eq!(rig.maps().last(), Some(&std::path::PathBuf::from("maps/arena.yaml")));
    }

    #[test]
    fn map_failure_while_building_leaves_active_world_alone() {
        let mut rig = TestRig::started(Config::default());
        rig.fail_maps();
        let err = rig
            .game
            .build_world("arena", std::path::Path::new("maps/arena.yaml"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Map(_)));

        let world = rig.game.world().unwrap();
        assert_eq!(world.label(), "main");
        assert_eq!(world.state(), WorldState::Started);
        assert!(rig.game.other_worlds().is_empty());
        assert!(
            !rig.log()
                .iter()
                .any(|entry| entry.starts_with("pre_stop") || entry.contains("destroy"))
        );
    }

    #[test]
    fn builder_defaults_are_headless() {
        let mut game = Game::builder(Config::default())
            .hooks(RecordingHooks::default())
            .map_loader(crate::testing::RecordingMapLoader::default())
            .build();
        game.setup().unwrap();
        assert!(game.is_running());
        assert_eq!(game.state(), LoopState::Running);
    }
}
