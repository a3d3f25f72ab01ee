use std::collections::BTreeSet;

use glam::Vec2;

use crate::action::{Action, ActionMap};
use crate::event::InputEvent;

/// Input as seen by simulations for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: BTreeSet<Action>,
    /// Mouse movement accumulated since the previous cycle.
    pub mouse_delta: Vec2,
}

impl InputState {
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn held(&self) -> impl Iterator<Item = Action> + '_ {
        self.held.iter().copied()
    }
}

/// Folds raw window events into an [`InputState`].
#[derive(Debug, Default)]
pub struct InputManager {
    map: ActionMap,
    state: InputState,
}

impl InputManager {
    pub fn new(map: ActionMap) -> Self {
        Self {
            map,
            state: InputState::default(),
        }
    }

    /// Forget held actions and pending motion. Called whenever a new world
    /// becomes active so keys held in the old world do not leak into it.
    pub fn init(&mut self) {
        self.state = InputState::default();
        tracing::debug!("input manager initialized");
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                if let Some(action) = self.map.action_for(*key) {
                    self.state.held.insert(action);
                }
            }
            InputEvent::KeyReleased(key) => {
                if let Some(action) = self.map.action_for(*key) {
                    self.state.held.remove(&action);
                }
            }
            InputEvent::MouseMotion { dx, dy } => {
                self.state.mouse_delta += Vec2::new(*dx, *dy);
            }
            InputEvent::Resized { .. } | InputEvent::CloseRequested => {}
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn action_map_mut(&mut self) -> &mut ActionMap {
        &mut self.map
    }

    /// Take the snapshot for this cycle and reset per-cycle motion.
    pub fn take_snapshot(&mut self) -> InputState {
        let snapshot = self.state.clone();
        self.state.mouse_delta = Vec2::ZERO;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyCode;

    #[test]
    fn press_and_release_track_actions() {
        let mut input = InputManager::default();
        input.handle(&InputEvent::KeyPressed(KeyCode::W));
        input.handle(&InputEvent::KeyPressed(KeyCode::D));
        assert!(input.state().is_held(Action::MoveForward));
        assert!(input.state().is_held(Action::StrafeRight));

        input.handle(&InputEvent::KeyReleased(KeyCode::W));
        assert!(!input.state().is_held(Action::MoveForward));
        assert_eq!(input.state().held().count(), 1);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputManager::default();
        input.handle(&InputEvent::KeyPressed(KeyCode::G));
        assert_eq!(input.state(), &InputState::default());
    }

    #[test]
    fn snapshot_resets_mouse_but_keeps_held() {
        let mut input = InputManager::default();
        input.handle(&InputEvent::KeyPressed(KeyCode::Space));
        input.handle(&InputEvent::MouseMotion { dx: 2.0, dy: 1.0 });
        input.handle(&InputEvent::MouseMotion { dx: 1.0, dy: -3.0 });

        let snap = input.take_snapshot();
        assert_eq!(snap.mouse_delta, Vec2::new(3.0, -2.0));
        assert!(snap.is_held(Action::Jump));

        let next = input.take_snapshot();
        assert_eq!(next.mouse_delta, Vec2::ZERO);
        assert!(next.is_held(Action::Jump));
    }

    #[test]
    fn init_clears_everything() {
        let mut input = InputManager::default();
        input.handle(&InputEvent::KeyPressed(KeyCode::A));
        input.init();
        assert_eq!(input.state(), &InputState::default());
    }
}
