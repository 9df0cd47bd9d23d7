use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terrane_core::constants::*;
use terrane_core::math::max_chunks_in_range;
use terrane_core::ConfigError;

/// Distance bounds for chunk streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Horizontal distance (world units) within which missing chunks are activated.
    pub max_range: f32,
    /// Active chunk count that forces an eviction every tick.
    pub hard_cap: usize,
    /// Active chunk count the world drifts back to once nothing is left to load.
    pub soft_target: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_MAX_RANGE,
            hard_cap: DEFAULT_HARD_CAP,
            soft_target: DEFAULT_SOFT_TARGET,
        }
    }
}

/// World settings, loadable from RON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for terrain noise.
    pub seed: u32,
    /// Directory holding per-chunk save files.
    pub save_dir: PathBuf,
    /// Water level of generated terrain.
    pub sea_level: u32,
    pub streaming: StreamingConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            save_dir: PathBuf::from("saves"),
            sea_level: DEFAULT_SEA_LEVEL,
            streaming: StreamingConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a RON config string.
    pub fn from_ron(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: WorldConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Reject settings the streaming and terrain code cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.streaming;
        if s.hard_cap == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "streaming.hard_cap",
                reason: "must be at least 1".into(),
            });
        }
        if s.soft_target >= s.hard_cap {
            return Err(ConfigError::InvalidSetting {
                field: "streaming.soft_target",
                reason: format!(
                    "must be below hard_cap ({} >= {})",
                    s.soft_target, s.hard_cap
                ),
            });
        }
        if !(s.max_range > 0.0) {
            return Err(ConfigError::InvalidSetting {
                field: "streaming.max_range",
                reason: format!("must be positive, got {}", s.max_range),
            });
        }
        let in_range = chunks_in_range_at_least(s.max_range, s.soft_target);
        if in_range > s.soft_target {
            return Err(ConfigError::InvalidSetting {
                field: "streaming.soft_target",
                reason: format!(
                    "{in_range} chunks can sit within max_range {}, above soft_target {}",
                    s.max_range, s.soft_target
                ),
            });
        }
        if self.sea_level >= CHUNK_HEIGHT {
            return Err(ConfigError::InvalidSetting {
                field: "sea_level",
                reason: format!("must be below chunk height {CHUNK_HEIGHT}"),
            });
        }
        Ok(())
    }
}

/// Worst-case in-range chunk count, or a lower bound on it once that bound
/// already exceeds `limit`. A disk of radius `r` chunks holds at least
/// `pi * (r - sqrt(2) / 2)^2` lattice points.
fn chunks_in_range_at_least(max_range: f32, limit: usize) -> usize {
    let r = max_range / CHUNK_WIDTH as f32 - std::f32::consts::FRAC_1_SQRT_2;
    if r > 0.0 {
        let lower = (std::f32::consts::PI * r * r) as usize;
        if lower > limit {
            return lower;
        }
    }
    max_chunks_in_range(max_range)
}
