use glam::Vec3;
use lumen_common::TimeDelta;
use lumen_input::Action;

use super::{Simulation, SimulationError};
use crate::world::World;

/// Turns the cycle's input snapshot into player look and movement intent.
#[derive(Debug, Clone)]
pub struct PlayerSimulation {
    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for PlayerSimulation {
    fn default() -> Self {
        Self { sensitivity: 0.003 }
    }
}

impl Simulation for PlayerSimulation {
    fn name(&self) -> &'static str {
        "player"
    }

    fn update(&mut self, world: &mut World, _elapsed: TimeDelta) -> Result<(), SimulationError> {
        let (input, player) = world.input_and_player_mut();

        let delta = input.mouse_delta;
        if delta != glam::Vec2::ZERO {
            player.look(-delta.x * self.sensitivity, -delta.y * self.sensitivity);
        }

        let mut wish = Vec3::ZERO;
        if input.is_held(Action::MoveForward) {
            wish += player.flat_forward();
        }
        if input.is_held(Action::MoveBackward) {
            wish -= player.flat_forward();
        }
        if input.is_held(Action::StrafeRight) {
            wish += player.flat_right();
        }
        if input.is_held(Action::StrafeLeft) {
            wish -= player.flat_right();
        }
        let horizontal = wish.normalize_or_zero() * player.speed;
        player.velocity.x = horizontal.x;
        player.velocity.z = horizontal.z;

        if input.is_held(Action::Jump) && player.on_ground {
            player.velocity.y = player.jump_speed;
            player.on_ground = false;
            tracing::trace!("player jumped");
        }
        Ok(())
    }
}
