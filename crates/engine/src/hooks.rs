use lumen_kernel::World;

use crate::error::EngineError;

pub type HookResult = anyhow::Result<()>;

/// Extension points around setup, teardown and every world transition.
///
/// All methods default to doing nothing. They run synchronously on the
/// cycle thread; an error aborts the operation that called the hook and is
/// returned to its caller as [`EngineError::Hook`].
pub trait GameHooks {
    /// After the window is created.
    fn init_hook(&mut self) -> HookResult {
        Ok(())
    }

    /// Before the first world is built, to register custom map triggers.
    fn custom_trigger_hook(&mut self) -> HookResult {
        Ok(())
    }

    /// Last step of setup.
    fn post_setup(&mut self) -> HookResult {
        Ok(())
    }

    /// First step of teardown.
    fn remove_hook(&mut self) -> HookResult {
        Ok(())
    }

    fn on_pre_create_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_post_create_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_pre_start_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_post_start_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_pre_stop_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_post_stop_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_pre_destroy_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }

    fn on_post_destroy_world(&mut self, _world: &mut World) -> HookResult {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

/// Attach the hook name to a hook failure.
pub(crate) fn hook(name: &'static str, result: HookResult) -> Result<(), EngineError> {
    result.map_err(|source| {
        tracing::error!(hook = name, "hook failed: {source:#}");
        EngineError::Hook { hook: name, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_hooks_succeed() {
        let mut hooks = NoHooks;
        let mut world = World::new();
        assert!(hooks.on_pre_create_world(&mut world).is_ok());
        assert!(hooks.on_post_destroy_world(&mut world).is_ok());
        assert!(hooks.remove_hook().is_ok());
    }

    #[test]
    fn hook_error_names_the_hook() {
        let err = hook("on_post_start_world", Err(anyhow::anyhow!("asset missing"))).unwrap_err();
        assert!(matches!(err, EngineError::Hook { hook: "on_post_start_world", .. }));
        assert_eq!(err.to_string(), "on_post_start_world hook failed: asset missing");
    }
}
