use serde::Serialize;

use crate::simulation::SimulationError;

/// Lifecycle state of a [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorldState {
    Uninitialized,
    Created,
    Started,
    Running,
    Stopped,
    Destroyed,
}

impl WorldState {
    /// Whether `self -> to` is a legal lifecycle step.
    ///
    /// `Stopped -> Started` is legal so a world stashed away after stopping
    /// can be resumed.
    pub fn can_transition(self, to: WorldState) -> bool {
        use WorldState::*;
        matches!(
            (self, to),
            (Uninitialized, Created)
                | (Created | Stopped, Started)
                | (Started, Running)
                | (Started | Running, Stopped)
                | (Uninitialized | Created | Stopped, Destroyed)
        )
    }

    /// Started or Running: simulations may be updated.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Started | Self::Running)
    }
}

impl std::fmt::Display for WorldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Created => "created",
            Self::Started => "started",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid world transition {from} -> {to}")]
    InvalidTransition { from: WorldState, to: WorldState },
    #[error("world is {0}, cannot update")]
    NotLive(WorldState),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}
