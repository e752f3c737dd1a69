//! Engine configuration
//!
//! Every field has a default matching the classic rules, so an empty JSON
//! object is a complete configuration. Unknown fields are rejected.
//!
//! ```
//! use blockfall_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "seed": 7, "spawn_columns": "bounded" }"#).unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.initial_fall_interval, 0.30);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scoring::ScoringRules;
use crate::types::{
    DEFAULT_FALL_INTERVAL_SECS, FALL_INTERVAL_STEP_SECS, MIN_FALL_INTERVAL_SECS, POINTS_PER_ROW,
    SPEEDUP_SCORE_STEP,
};
use crate::validator::SpawnColumns;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u32>,
    /// Seconds between automatic descents at game start
    pub initial_fall_interval: f64,
    /// Floor for the fall interval
    pub min_fall_interval: f64,
    /// Reduction applied on each speed-up
    pub fall_interval_step: f64,
    pub points_per_row: u32,
    /// Score multiple that triggers a speed-up
    pub speedup_score_step: u32,
    /// Column policy for piece cells above the top row
    pub spawn_columns: SpawnColumns,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_fall_interval: DEFAULT_FALL_INTERVAL_SECS,
            min_fall_interval: MIN_FALL_INTERVAL_SECS,
            fall_interval_step: FALL_INTERVAL_STEP_SECS,
            points_per_row: POINTS_PER_ROW,
            speedup_score_step: SPEEDUP_SCORE_STEP,
            spawn_columns: SpawnColumns::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_fall_interval", self.initial_fall_interval)?;
        positive("min_fall_interval", self.min_fall_interval)?;
        if !(self.fall_interval_step.is_finite() && self.fall_interval_step >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "fall_interval_step",
                reason: format!("must be a non-negative number, got {}", self.fall_interval_step),
            });
        }
        if self.min_fall_interval > self.initial_fall_interval {
            return Err(ConfigError::Invalid {
                field: "min_fall_interval",
                reason: format!(
                    "{} exceeds initial_fall_interval {}",
                    self.min_fall_interval, self.initial_fall_interval
                ),
            });
        }
        if self.speedup_score_step == 0 {
            return Err(ConfigError::Invalid {
                field: "speedup_score_step",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            points_per_row: self.points_per_row,
            speedup_score_step: self.speedup_score_step,
            fall_interval_step: self.fall_interval_step,
            min_fall_interval: self.min_fall_interval,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number of seconds, got {}", value),
        })
    }
}
