use lumen_common::TimeDelta;

use super::{Simulation, SimulationError};
use crate::world::World;

/// Gravity and a flat floor for the player body.
#[derive(Debug, Clone)]
pub struct PhysicsSimulation {
    /// Vertical acceleration in units/s^2, negative is down.
    pub gravity: f32,
    /// Height of the floor plane the player stands on.
    pub floor: f32,
}

impl Default for PhysicsSimulation {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            floor: 0.0,
        }
    }
}

impl Simulation for PhysicsSimulation {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn update(&mut self, world: &mut World, elapsed: TimeDelta) -> Result<(), SimulationError> {
        let dt = elapsed.as_secs_f32();
        let player = world.player_mut();

        if !player.on_ground {
            player.velocity.y += self.gravity * dt;
        }
        player.transform.position += player.velocity * dt;

        if player.transform.position.y <= self.floor {
            player.transform.position.y = self.floor;
            player.velocity.y = player.velocity.y.max(0.0);
            player.on_ground = true;
        }

        if !player.transform.is_finite() || !player.velocity.is_finite() {
            return Err(SimulationError {
                simulation: self.name(),
                reason: format!("player diverged at {:?}", player.transform.position),
            });
        }
        Ok(())
    }
}
