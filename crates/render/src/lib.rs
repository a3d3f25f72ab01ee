//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read world state; they never mutate it.
//! - A renderer is bound to one world. When the active world changes the
//!   game builds a fresh renderer instead of rebinding the old one.
//!
//! # Workaround
//! Provides a trait-based renderer interface with a debug text renderer as a
//! workaround for a GPU backend. The traits are stable; swap in a GPU
//! implementation without changing the game loop.

mod overlay;
mod renderer;
mod screen;

pub use overlay::Overlay;
pub use renderer::{
    DebugTextRenderer, Frame, RenderContext, RenderError, Renderer, SubRenderer, Viewport,
};
pub use screen::{Screen, ScreenQueue, ScreenRenderer};

pub fn crate_info() -> &'static str {
    "lumen-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
