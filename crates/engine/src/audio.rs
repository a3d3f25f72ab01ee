use lumen_kernel::Player;

/// Positional audio keyed off the player, updated once per cycle after the
/// world's simulations.
pub trait AudioListener {
    fn update(&mut self, player: &Player);
}
