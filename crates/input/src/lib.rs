//! Window and input contracts: raw window events, key-to-action mapping, the
//! per-cycle input snapshot, and the window collaborator trait.
//!
//! # Invariants
//! - Simulations consume actions through [`InputState`], never raw key codes.
//! - The window is only polled from the cycle thread.

pub mod action;
pub mod event;
pub mod manager;
pub mod window;

pub use action::{Action, ActionMap};
pub use event::{EventKind, InputEvent, KeyCode};
pub use manager::{InputManager, InputState};
pub use window::{HeadlessHandle, HeadlessWindow, Window, WindowError};

pub fn crate_info() -> &'static str {
    "lumen-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
