//! World lifecycle: creation, activation, teardown and the registry of
//! other worlds.

use std::rc::Rc;

use lumen_input::{EventKind, InputEvent, KeyCode};
use lumen_kernel::{PhysicsSimulation, PlayerSimulation, World, WorldError, WorldState};
use lumen_render::{ScreenRenderer, Viewport};

use crate::error::EngineError;
use crate::game::Game;
use crate::hooks::{GameHooks, hook};

/// pre-stop → stop → post-stop. A world that never went live skips the
/// stop itself but still sees both hooks.
fn stop_world<H: GameHooks>(hooks: &mut H, world: &mut World) -> Result<(), EngineError> {
    hook("on_pre_stop_world", hooks.on_pre_stop_world(world))?;
    if world.state().is_live() {
        world.on_stop()?;
    }
    hook("on_post_stop_world", hooks.on_post_stop_world(world))
}

/// pre-destroy → destroy → post-destroy.
fn destroy_world<H: GameHooks>(hooks: &mut H, world: &mut World) -> Result<(), EngineError> {
    hook("on_pre_destroy_world", hooks.on_pre_destroy_world(world))?;
    if world.state().can_transition(WorldState::Destroyed) {
        world.on_destroy()?;
    }
    hook("on_post_destroy_world", hooks.on_post_destroy_world(world))
}

fn ensure_startable(world: &World) -> Result<(), EngineError> {
    if world.state().can_transition(WorldState::Started) {
        return Ok(());
    }
    Err(EngineError::World(WorldError::InvalidTransition {
        from: world.state(),
        to: WorldState::Started,
    }))
}

impl<H: GameHooks> Game<H> {
    /// Bring an uninitialized world to Created: share the configuration,
    /// register the standard simulations and spawn the player.
    pub fn create_world(&mut self, world: &mut World) -> Result<(), EngineError> {
        hook("on_pre_create_world", self.hooks.on_pre_create_world(world))?;
        world.set_config(Rc::clone(&self.config));
        world.on_create()?;
        {
            let mut tx = world.simulations.transact();
            tx.add_simulation(PlayerSimulation::default());
            tx.add_simulation(PhysicsSimulation::default());
        }
        world.init_player();
        hook("on_post_create_world", self.hooks.on_post_create_world(world))?;
        tracing::info!(world = world.label(), "world created");
        Ok(())
    }

    /// Replace the active world.
    ///
    /// The previous world is stopped and destroyed before anything happens
    /// to `new_world`. A new world then gets a fresh renderer, reset input
    /// and is started. `None` leaves no world active. A world that cannot
    /// start is refused before the previous one is touched.
    pub fn set_world(&mut self, new_world: Option<World>) -> Result<(), EngineError> {
        if let Some(world) = new_world.as_ref() {
            ensure_startable(world)?;
        }
        if let Some(old) = self.world.as_mut() {
            let _span = tracing::info_span!("teardown", world = old.label()).entered();
            stop_world(&mut self.hooks, old)?;
            if let Some(id) = self.screenshot.observer.take() {
                old.event.remove_observer(id);
            }
            destroy_world(&mut self.hooks, old)?;
        }
        if let Some(old) = std::mem::replace(&mut self.world, new_world) {
            tracing::info!(world = old.label(), "world released");
        }
        self.renderer = None;

        let Some(world) = self.world.as_mut() else {
            return Ok(());
        };
        let _span = tracing::info_span!("activate", world = world.label()).entered();

        let mut renderer = (self.renderer_factory)();
        renderer.bind_viewport(Viewport::from_size(self.window.size()));
        renderer.add_renderer(Box::new(ScreenRenderer::new()));
        renderer.init(world)?;
        self.renderer = Some(renderer);

        self.input.init();
        hook("on_pre_start_world", self.hooks.on_pre_start_world(world))?;
        world.on_start()?;
        hook("on_post_start_world", self.hooks.on_post_start_world(world))?;

        let requested = Rc::clone(&self.screenshot.requested);
        let observer = world.event.add_observer(EventKind::KeyReleased, move |event| {
            if matches!(event, InputEvent::KeyReleased(KeyCode::G)) {
                requested.set(true);
            }
        });
        self.screenshot.observer = Some(observer);

        tracing::info!(world = world.label(), "world active");
        Ok(())
    }

    /// Make the world stored under `name` active, removing it from the
    /// registry. The current world is destroyed, not stored.
    pub fn switch_to_other_world(&mut self, name: &str) -> Result<(), EngineError> {
        let world = self
            .other_worlds
            .take(name)
            .ok_or_else(|| EngineError::WorldNotFound(name.to_string()))?;
        tracing::info!(name, "switching world");
        self.set_world(Some(world))
    }

    /// Store a created or stopped world under `name` for a later switch.
    pub fn stash_world(&mut self, name: &str, world: World) -> Result<(), EngineError> {
        if let Err(e) = ensure_startable(&world) {
            tracing::warn!(name, state = %world.state(), "refusing to store a world that cannot start");
            return Err(e);
        }
        self.other_worlds.insert(name, world)
    }

    /// Stop the active world without destroying it and store it under
    /// `name`. No world is active afterwards.
    pub fn stash_active_world(&mut self, name: &str) -> Result<(), EngineError> {
        if self.other_worlds.contains(name) {
            return Err(EngineError::DuplicateWorld(name.to_string()));
        }
        let Some(mut world) = self.world.take() else {
            return Err(EngineError::NoActiveWorld);
        };
        if let Err(e) = stop_world(&mut self.hooks, &mut world) {
            self.world = Some(world);
            return Err(e);
        }
        if let Some(id) = self.screenshot.observer.take() {
            world.event.remove_observer(id);
        }
        self.renderer = None;
        tracing::info!(name, world = world.label(), "active world stashed");
        self.other_worlds.insert(name, world)
    }

    /// Destroy every stored world. Returns how many were dropped.
    pub fn clear_other_world_list(&mut self) -> usize {
        let mut count = 0;
        for (name, mut world) in self.other_worlds.drain() {
            if world.state().can_transition(WorldState::Destroyed) {
                if let Err(e) = world.on_destroy() {
                    tracing::warn!(name = %name, "stored world not destroyed cleanly: {e}");
                }
            }
            tracing::debug!(name = %name, "stored world dropped");
            count += 1;
        }
        count
    }
}
