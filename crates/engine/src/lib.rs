//! Game orchestration core: owns the active world, drives the per-cycle
//! sequence and manages world lifecycle transitions.
//!
//! # Invariants
//! - At most one world is active. Replacing it always runs the full
//!   stop → destroy sequence on the old world before the new one starts.
//! - A world lives in exactly one place: the active slot or one registry
//!   entry. Transfers are moves.
//! - Each cycle runs poll → update → render → deferred drain, in that order.
//! - Close is observed only at the top of a cycle.

mod audio;
mod cycle;
mod deferred;
mod error;
mod game;
mod hooks;
mod lifecycle;
mod map;
mod registry;
mod timing;

#[cfg(test)]
mod testing;

pub use audio::AudioListener;
pub use deferred::DeferredQueue;
pub use error::EngineError;
pub use game::{Game, GameBuilder, LoopState, RendererFactory};
pub use hooks::{GameHooks, HookResult, NoHooks};
pub use map::{DEFAULT_MAP, MapError, MapLoader, YamlMapLoader, resolve_map_path};
pub use registry::WorldRegistry;
pub use timing::{Fps, FrameTiming};

pub fn crate_info() -> &'static str {
    "lumen-engine v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("engine"));
    }
}
