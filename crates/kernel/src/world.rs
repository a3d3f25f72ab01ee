use std::collections::BTreeMap;
use std::rc::Rc;

use lumen_common::{Config, EntityId, TimeDelta, Transform};
use lumen_input::InputState;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::event::EventBus;
use crate::player::Player;
use crate::simulation::SimulationManager;
use crate::state::{WorldError, WorldState};

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub transform: Transform,
}

/// A simulated environment: simulations, camera, player, event bus and the
/// static entities its map placed.
///
/// A world is owned by exactly one place at a time (the game's active slot
/// or one registry entry) and is moved, never shared.
///
/// Uses BTreeMap for deterministic entity iteration order.
pub struct World {
    label: String,
    state: WorldState,
    pub simulations: SimulationManager,
    pub camera: Camera,
    pub event: EventBus,
    player: Player,
    input: InputState,
    config: Option<Rc<Config>>,
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
}

impl World {
    pub fn new() -> Self {
        Self::named("world")
    }

    /// Create an uninitialized world with a label used in logs and the
    /// inspector.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: WorldState::Uninitialized,
            simulations: SimulationManager::new(),
            camera: Camera::default(),
            event: EventBus::new(),
            player: Player::default(),
            input: InputState::default(),
            config: None,
            entities: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    /// Number of successful updates since creation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_deref()
    }

    pub fn set_config(&mut self, config: Rc<Config>) {
        self.config = Some(config);
    }

    // --- lifecycle ---

    fn transition(&mut self, to: WorldState) -> Result<(), WorldError> {
        let from = self.state;
        if !from.can_transition(to) {
            tracing::warn!(world = %self.label, %from, %to, "rejected world transition");
            return Err(WorldError::InvalidTransition { from, to });
        }
        self.state = to;
        tracing::debug!(world = %self.label, %from, %to, "world transition");
        Ok(())
    }

    pub fn on_create(&mut self) -> Result<(), WorldError> {
        self.transition(WorldState::Created)
    }

    pub fn on_start(&mut self) -> Result<(), WorldError> {
        self.transition(WorldState::Started)
    }

    pub fn on_stop(&mut self) -> Result<(), WorldError> {
        self.transition(WorldState::Stopped)?;
        self.input = InputState::default();
        Ok(())
    }

    /// Final transition. Releases simulations and observers.
    pub fn on_destroy(&mut self) -> Result<(), WorldError> {
        self.transition(WorldState::Destroyed)?;
        self.simulations = SimulationManager::new();
        self.event = EventBus::new();
        Ok(())
    }

    // --- player and input ---

    /// Reset the player entity to its spawn defaults.
    pub fn init_player(&mut self) {
        self.player = Player::default();
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Install this cycle's input snapshot.
    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    pub fn input_and_player_mut(&mut self) -> (&InputState, &mut Player) {
        (&self.input, &mut self.player)
    }

    // --- update ---

    /// Run every committed simulation once, in commit order.
    ///
    /// The first Started update moves the world to Running. A failing
    /// simulation stops the pass; the tick only advances on success.
    pub fn update(&mut self, elapsed: TimeDelta) -> Result<(), WorldError> {
        if !self.state.is_live() {
            return Err(WorldError::NotLive(self.state));
        }
        if self.state == WorldState::Started {
            self.transition(WorldState::Running)?;
        }

        let mut active = self.simulations.take_active();
        let result = active
            .iter_mut()
            .try_for_each(|simulation| simulation.update(self, elapsed));
        self.simulations.restore_active(active);
        result?;

        self.tick += 1;
        tracing::trace!(world = %self.label, tick = self.tick, elapsed_ms = elapsed.as_millis(), "world updated");
        Ok(())
    }

    // --- static entities ---

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity with the given transform. Returns its id.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(id, EntityData { transform });
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("simulations", &self.simulations)
            .field("entities", &self.entities.len())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
