use std::collections::BTreeMap;

use lumen_kernel::World;

use crate::error::EngineError;

/// Inactive worlds kept by name so the game can switch back to them.
///
/// Names are unique. Taking a world removes its entry; the registry never
/// hands out a world that is also active.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    worlds: BTreeMap<String, World>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `world` under `name`. A name already in use is rejected and
    /// the stored world is left untouched.
    pub fn insert(&mut self, name: impl Into<String>, world: World) -> Result<(), EngineError> {
        let name = name.into();
        if self.worlds.contains_key(&name) {
            return Err(EngineError::DuplicateWorld(name));
        }
        tracing::debug!(name = %name, world = world.label(), state = %world.state(), "world stored");
        self.worlds.insert(name, world);
        Ok(())
    }

    /// Remove and return the world stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<World> {
        self.worlds.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&World> {
        self.worlds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.worlds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.worlds.keys().map(String::as_str).collect()
    }

    /// Remove every entry, in name order.
    pub fn drain(&mut self) -> std::collections::btree_map::IntoIter<String, World> {
        std::mem::take(&mut self.worlds).into_iter()
    }
}
