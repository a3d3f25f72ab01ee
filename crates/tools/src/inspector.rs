use lumen_kernel::World;
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Read-only queries against a world for debugging and the overlay.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            label: world.label().to_string(),
            state: world.state().to_string(),
            tick: world.tick(),
            simulations: world.simulations.names(),
            entity_count: world.entity_count(),
            observers: world.event.len(),
            player: Self::player(world),
        }
    }

    pub fn player(world: &World) -> PlayerInfo {
        let p = world.player();
        let pos = p.position();
        let vel = p.velocity;
        PlayerInfo {
            position: [pos.x, pos.y, pos.z],
            velocity: [vel.x, vel.y, vel.z],
            yaw: p.yaw,
            pitch: p.pitch,
            on_ground: p.on_ground,
        }
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub label: String,
    pub state: String,
    pub tick: u64,
    pub simulations: Vec<&'static str>,
    pub entity_count: usize,
    pub observers: usize,
    pub player: PlayerInfo,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World '{}': state={} tick={} simulations=[{}] entities={} observers={}",
            self.label,
            self.state,
            self.tick,
            self.simulations.join(", "),
            self.entity_count,
            self.observers
        )
    }
}

/// Player pose and motion.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerInfo {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl std::fmt::Display for PlayerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) {}",
            self.position[0],
            self.position[1],
            self.position[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
            if self.on_ground { "grounded" } else { "airborne" },
        )
    }
}
