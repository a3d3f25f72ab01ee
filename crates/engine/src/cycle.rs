//! The game cycle: poll, update, render, drain. Repeated until close.

use glam::Vec3;
use lumen_input::InputEvent;
use lumen_kernel::World;
use lumen_render::{RenderContext, Viewport};

use crate::error::EngineError;
use crate::game::{Game, LoopState};
use crate::hooks::{GameHooks, hook};

/// Point the world camera through the player's eyes.
fn prepare_camera(world: &mut World, width: u32, height: u32) {
    let player = world.player();
    let eye = player.position() + Vec3::new(0.0, player.scale().y / 2.0, 0.0);
    let orientation = player.head_orientation();

    let camera = &mut world.camera;
    camera.set_perspective();
    camera.set_aspect_from_size(width, height);
    camera.set_position(eye);
    camera.set_orientation(orientation);
}

impl<H: GameHooks> Game<H> {
    /// Run cycles until close is requested, then tear down.
    ///
    /// A failing cycle ends the loop; teardown still runs and the cycle's
    /// error is returned.
    pub fn run(&mut self) -> Result<(), EngineError> {
        tracing::info!("game loop started");
        let mut cycles: u64 = 0;
        while self.is_running() {
            if let Err(e) = self.cycle() {
                tracing::error!(cycles, "game cycle failed: {e}");
                if let Err(cleanup) = self.clean_up() {
                    tracing::warn!("teardown after failure also failed: {cleanup}");
                }
                return Err(e);
            }
            cycles += 1;
        }
        tracing::info!(cycles, "game loop finished");
        self.clean_up()
    }

    /// One pass of poll → update → render → deferred drain.
    pub fn cycle(&mut self) -> Result<(), EngineError> {
        let _span = tracing::info_span!("game_cycle").entered();
        self.pre_cycle();
        self.update()?;
        self.render()?;
        self.post_cycle();
        Ok(())
    }

    /// Pump window events through the overlay, the input manager and the
    /// active world's observers, then hand the world this cycle's input.
    pub fn pre_cycle(&mut self) {
        let _span = tracing::debug_span!("pre_cycle").entered();
        for event in self.window.process_events() {
            if let Some(overlay) = self.overlay.as_mut() {
                if overlay.process_event(&event) {
                    continue;
                }
            }
            if event == InputEvent::CloseRequested {
                self.close();
            }
            self.input.handle(&event);
            if let Some(world) = self.world.as_mut() {
                world.event.dispatch(&event);
            }
        }

        let snapshot = self.input.take_snapshot();
        if let Some(world) = self.world.as_mut() {
            world.set_input(snapshot);
        }
        if self.screenshot.requested.replace(false) {
            self.take_screenshot();
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.new_frame();
        }
    }

    fn take_screenshot(&mut self) {
        let path = self.config.screenshot_path();
        if let Err(e) = self.window.print_screen_to_file(&path) {
            tracing::error!(path = %path.display(), "screenshot failed: {e}");
        }
    }

    /// Advance the active world by the time since the last update.
    ///
    /// The update mark only moves once every simulation has succeeded.
    pub fn update(&mut self) -> Result<(), EngineError> {
        let now = self.clock.now_millis();
        let elapsed = self.timing.sample(now);
        if let Some(world) = self.world.as_mut() {
            let _span = tracing::debug_span!("update", elapsed_ms = elapsed.as_millis()).entered();
            world.update(elapsed)?;
            if let Some(audio) = self.audio.as_mut() {
                audio.update(world.player());
            }
        }
        self.timing.mark_updated();
        Ok(())
    }

    /// Draw the active world, the overlay and this cycle's screens, then
    /// present. Does nothing without an active world.
    pub fn render(&mut self) -> Result<(), EngineError> {
        let (Some(world), Some(renderer)) = (self.world.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        let _span = tracing::debug_span!("render").entered();
        let (width, height) = self.window.size();
        prepare_camera(world, width, height);

        let ctx = RenderContext {
            world,
            screens: self.screens.as_slice(),
            viewport: Viewport::new(width, height),
        };
        renderer.render(&ctx)?;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.render(&ctx)?;
        }
        self.screens.clear();

        self.fps.count_cycle(self.timing.current_time);
        self.window.swap_buffers();
        self.timing.mark_rendered();
        Ok(())
    }

    /// Run everything deferred so far.
    pub fn post_cycle(&mut self) {
        if self.deferred.is_empty() {
            return;
        }
        let _span = tracing::debug_span!("post_cycle").entered();
        let ran = self.deferred.drain();
        tracing::trace!(ran, "deferred callbacks ran");
    }

    /// Ask the loop to stop. Takes effect at the top of the next cycle.
    pub fn close(&mut self) {
        if self.state == LoopState::Running {
            tracing::info!("close requested");
            self.state = LoopState::CloseRequested;
        }
    }

    /// Tear down: remove hooks, destroy the active world, shut the overlay
    /// and close the window. Runs once; later calls do nothing.
    pub fn clean_up(&mut self) -> Result<(), EngineError> {
        if self.state == LoopState::Closed {
            return Ok(());
        }
        let _span = tracing::info_span!("clean_up").entered();
        hook("remove_hook", self.hooks.remove_hook())?;
        self.set_world(None)?;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.shutdown();
        }
        self.window.close();
        self.state = LoopState::Closed;
        tracing::info!(stored_worlds = self.other_worlds.len(), "game closed");
        Ok(())
    }
}
