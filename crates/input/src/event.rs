use serde::{Deserialize, Serialize};

/// Physical keys the core knows about. Anything else arrives as `Other`
/// carrying the backend scancode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    G,
    Space,
    Escape,
    F1,
    Other(u32),
}

/// A raw event produced by the window collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    MouseMotion { dx: f32, dy: f32 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// Discriminant used to subscribe to one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    KeyPressed,
    KeyReleased,
    MouseMotion,
    Resized,
    CloseRequested,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyPressed(_) => EventKind::KeyPressed,
            Self::KeyReleased(_) => EventKind::KeyReleased,
            Self::MouseMotion { .. } => EventKind::MouseMotion,
            Self::Resized { .. } => EventKind::Resized,
            Self::CloseRequested => EventKind::CloseRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(InputEvent::KeyPressed(KeyCode::W).kind(), EventKind::KeyPressed);
        assert_eq!(InputEvent::KeyReleased(KeyCode::G).kind(), EventKind::KeyReleased);
        assert_eq!(
            InputEvent::MouseMotion { dx: 1.0, dy: 0.0 }.kind(),
            EventKind::MouseMotion
        );
        assert_eq!(InputEvent::CloseRequested.kind(), EventKind::CloseRequested);
    }
}
