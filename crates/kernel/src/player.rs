use glam::{EulerRot, Quat, Vec3};
use lumen_common::Transform;

/// The player entity every world carries.
///
/// Yaw and pitch are kept separately from the body transform; the camera
/// follows the head, the body only turns with yaw.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub transform: Transform,
    pub velocity: Vec3,
    /// Radians, positive turns left.
    pub yaw: f32,
    /// Radians, clamped to just under +-90 degrees.
    pub pitch: f32,
    pub on_ground: bool,
    /// Horizontal speed in units per second.
    pub speed: f32,
    pub jump_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            transform: Transform::default().with_scale(Vec3::new(1.0, 1.8, 1.0)),
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
            speed: 4.0,
            jump_speed: 5.0,
        }
    }
}

impl Player {
    pub const PITCH_LIMIT: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn head_orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Apply a look delta in radians.
    pub fn look(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.transform.rotation = Quat::from_rotation_y(self.yaw);
    }

    /// Unit forward vector on the ground plane.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn flat_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}
