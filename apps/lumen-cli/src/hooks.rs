use lumen_engine::{GameHooks, HookResult};
use lumen_kernel::World;
use lumen_tools::{WorldInspector, WorldSummary};

/// Logs world transitions and keeps the last summary taken before a world
/// stopped, so it can be reported after teardown.
#[derive(Debug, Default)]
pub struct SessionHooks {
    last_summary: Option<WorldSummary>,
    worlds_started: u32,
}

impl SessionHooks {
    pub fn last_summary(&self) -> Option<&WorldSummary> {
        self.last_summary.as_ref()
    }

    pub fn worlds_started(&self) -> u32 {
        self.worlds_started
    }
}

impl GameHooks for SessionHooks {
    fn init_hook(&mut self) -> HookResult {
        tracing::debug!("window ready");
        Ok(())
    }

    fn on_post_create_world(&mut self, world: &mut World) -> HookResult {
        tracing::debug!(world = world.label(), sims = ?world.simulations.names(), "world created");
        Ok(())
    }

    fn on_post_start_world(&mut self, world: &mut World) -> HookResult {
        self.worlds_started += 1;
        tracing::info!(world = world.label(), entities = world.entity_count(), "world started");
        Ok(())
    }

    fn on_pre_stop_world(&mut self, world: &mut World) -> HookResult {
        self.last_summary = Some(WorldInspector::summary(world));
        Ok(())
    }

    fn on_post_destroy_world(&mut self, world: &mut World) -> HookResult {
        tracing::info!(world = world.label(), ticks = world.tick(), "world destroyed");
        Ok(())
    }
}
