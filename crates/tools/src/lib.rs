//! Developer Tooling: world inspector, inspector overlay, console, script host.
//!
//! # Invariants
//! - Tools only read world state.
//! - Nothing here is on the game loop's correctness path.

pub mod console;
pub mod inspector;
pub mod overlay;
pub mod script;

pub use console::{Console, ConsoleOutcome};
pub use inspector::{PlayerInfo, WorldInspector, WorldSummary};
pub use overlay::InspectorOverlay;
pub use script::{ScriptError, ScriptHost, Value};

pub fn crate_info() -> &'static str {
    "lumen-tools v0.1.0"
}
