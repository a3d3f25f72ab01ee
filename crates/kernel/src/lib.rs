//! World Kernel: the world container, its lifecycle state machine, the
//! simulations that advance it and the event bus observers hang off.
//!
//! # Invariants
//! - A world's simulation set is only observed fully committed.
//! - Simulations run in commit order, once per update.
//! - Lifecycle transitions follow [`WorldState::can_transition`]; anything
//!   else is rejected and leaves the state untouched.

pub mod camera;
pub mod event;
pub mod player;
pub mod simulation;
pub mod state;
pub mod world;

pub use camera::Camera;
pub use event::{EventBus, ObserverId};
pub use player::Player;
pub use simulation::{
    PhysicsSimulation, PlayerSimulation, Simulation, SimulationError, SimulationManager,
    Transaction,
};
pub use state::{WorldError, WorldState};
pub use world::{EntityData, World};

pub fn crate_info() -> &'static str {
    "lumen-kernel v0.1.0"
}
