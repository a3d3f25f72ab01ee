//! Map resolution and loading.
//!
//! A map file is YAML:
//!
//! ```yaml
//! name: courtyard
//! spawn: [0.0, 0.0, 5.0]
//! entities:
//!   - position: [1.0, 0.0, -2.0]
//!     scale: [2.0, 1.0, 2.0]
//!   - position: [-3.0, 0.0, -4.0]
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use lumen_common::{Config, Transform};
use lumen_kernel::World;
use serde::Deserialize;

/// Map loaded when the configuration names none, relative to the data
/// directory.
pub const DEFAULT_MAP: &str = "maps/default.yaml";

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("cannot read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid map {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Populates a created world from a map file.
pub trait MapLoader {
    fn load(&mut self, world: &mut World, path: &Path) -> Result<(), MapError>;
}

/// Pick the map file for this run.
///
/// A configured map name is joined onto the data directory; otherwise a
/// configured map path is used as given; otherwise `default_map` is joined
/// onto the data directory. Empty values count as unset.
pub fn resolve_map_path(config: &Config, default_map: &str) -> PathBuf {
    if let Some(map) = config.map() {
        config.data_dir.join(map)
    } else if let Some(path) = config.map_path() {
        path.to_path_buf()
    } else {
        config.data_dir.join(default_map)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    spawn: Option<[f32; 3]>,
    #[serde(default)]
    entities: Vec<MapEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapEntity {
    position: [f32; 3],
    #[serde(default = "unit_scale")]
    scale: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Reads YAML map files: a player spawn point plus static entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMapLoader;

impl YamlMapLoader {
    pub fn new() -> Self {
        Self
    }

    /// Apply map `text` to `world`. `path` is only used in errors.
    pub fn load_str(&self, world: &mut World, text: &str, path: &Path) -> Result<(), MapError> {
        let doc: MapDocument = serde_yaml::from_str(text).map_err(|source| MapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |reason: String| MapError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let spawn = doc.spawn.map(Vec3::from_array);
        if let Some(spawn) = spawn {
            if !spawn.is_finite() {
                return Err(invalid(format!("spawn point {spawn} is not finite")));
            }
        }

        let mut transforms = Vec::with_capacity(doc.entities.len());
        for (index, entity) in doc.entities.iter().enumerate() {
            let transform = Transform::from_position(Vec3::from_array(entity.position))
                .with_scale(Vec3::from_array(entity.scale));
            if !transform.is_finite() {
                return Err(invalid(format!("entity {index} has a non-finite transform")));
            }
            transforms.push(transform);
        }

        if let Some(spawn) = spawn {
            world.player_mut().set_position(spawn);
        }
        for transform in transforms {
            world.spawn(transform);
        }
        tracing::info!(
            path = %path.display(),
            map = doc.name.as_deref().unwrap_or("unnamed"),
            entities = world.entity_count(),
            "map loaded"
        );
        Ok(())
    }
}

impl MapLoader for YamlMapLoader {
    fn load(&mut self, world: &mut World, path: &Path) -> Result<(), MapError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(world, &text, path)
    }
}
