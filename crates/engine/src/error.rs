use lumen_input::WindowError;
use lumen_kernel::WorldError;
use lumen_render::RenderError;

use crate::map::MapError;

/// Errors surfaced by lifecycle operations and the game cycle.
///
/// Nothing is retried or rolled back; the operation that hit the error
/// returns it and steps already completed stay completed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no other world named '{0}'")]
    WorldNotFound(String),
    #[error("a world named '{0}' is already stored")]
    DuplicateWorld(String),
    #[error("no active world")]
    NoActiveWorld,
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Window(#[from] WindowError),
}
