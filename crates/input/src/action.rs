use std::collections::BTreeMap;

use crate::event::KeyCode;

/// A high-level player action. Simulations read actions, never raw keys, so
/// rebinding never touches simulation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Jump,
}

/// Key bindings from physical keys to actions.
#[derive(Debug, Clone)]
pub struct ActionMap {
    bindings: BTreeMap<KeyCode, Action>,
}

impl ActionMap {
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `key` to `action`, returning the action it was bound to before.
    pub fn bind(&mut self, key: KeyCode, action: Action) -> Option<Action> {
        self.bindings.insert(key, action)
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Action> {
        self.bindings.remove(&key)
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

impl Default for ActionMap {
    /// WASD movement, space to jump.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyCode::W, Action::MoveForward);
        map.bind(KeyCode::S, Action::MoveBackward);
        map.bind(KeyCode::A, Action::StrafeLeft);
        map.bind(KeyCode::D, Action::StrafeRight);
        map.bind(KeyCode::Space, Action::Jump);
        map
    }
}
