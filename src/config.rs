//! Engine configuration: scoring weights, search depth and pacing.
//!
//! Everything has a default matching the built-in weights in
//! [`crate::constants`], and can be overridden from a TOML file:
//!
//! ```toml
//! search_depth = 3
//! pacing_ms = 0
//!
//! [scoring.local]
//! triple_bonus = 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Weights for one level of the board (a sub-board or the meta board).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Flat score for any move
    pub base_score: i64,
    /// Reward for the first new two-in-a-row
    pub pair_bonus: i64,
    /// Each further new pair is worth this fraction of the previous one
    pub pair_ratio: f64,
    /// Reward for the first new three-in-a-row
    pub triple_bonus: i64,
    pub triple_ratio: f64,
    pub corner_weight: f64,
    pub side_weight: f64,
    pub center_weight: f64,
    /// Fraction of the opponent's best reply subtracted from a move
    pub opponent_weight: f64,
}

impl ScoringConfig {
    pub fn local() -> Self {
        Self {
            base_score: LOCAL_BASE_SCORE,
            pair_bonus: LOCAL_PAIR_BONUS,
            pair_ratio: LOCAL_PAIR_RATIO,
            triple_bonus: LOCAL_TRIPLE_BONUS,
            triple_ratio: LOCAL_TRIPLE_RATIO,
            corner_weight: CORNER_WEIGHT,
            side_weight: SIDE_WEIGHT,
            center_weight: CENTER_WEIGHT,
            opponent_weight: OPPONENT_WEIGHT,
        }
    }

    pub fn meta() -> Self {
        Self {
            base_score: META_BASE_SCORE,
            pair_bonus: META_PAIR_BONUS,
            pair_ratio: META_PAIR_RATIO,
            triple_bonus: META_TRIPLE_BONUS,
            triple_ratio: META_TRIPLE_RATIO,
            ..Self::local()
        }
    }

    fn validate(&self, level: &str) -> Result<(), ConfigError> {
        let ratios = [("pair_ratio", self.pair_ratio), ("triple_ratio", self.triple_ratio)];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{level}.{name} must be in [0, 1]"
                )));
            }
        }
        let weights = [
            ("corner_weight", self.corner_weight),
            ("side_weight", self.side_weight),
            ("center_weight", self.center_weight),
            ("opponent_weight", self.opponent_weight),
        ];
        for (name, value) in weights {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::Validation(format!("{level}.{name} must be >= 0")));
            }
        }
        if self.pair_bonus < 0 || self.triple_bonus < 0 {
            return Err(ConfigError::Validation(format!(
                "{level} bonuses must be >= 0"
            )));
        }
        Ok(())
    }
}

/// Weights for both levels.
///
/// In a file, each level only needs the fields that differ from that
/// level's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScoringFile")]
pub struct Scoring {
    pub local: ScoringConfig,
    pub meta: ScoringConfig,
}

/// Per-field overrides for one level, as read from a file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScoringOverrides {
    base_score: Option<i64>,
    pair_bonus: Option<i64>,
    pair_ratio: Option<f64>,
    triple_bonus: Option<i64>,
    triple_ratio: Option<f64>,
    corner_weight: Option<f64>,
    side_weight: Option<f64>,
    center_weight: Option<f64>,
    opponent_weight: Option<f64>,
}

impl ScoringOverrides {
    fn apply(self, base: ScoringConfig) -> ScoringConfig {
        ScoringConfig {
            base_score: self.base_score.unwrap_or(base.base_score),
            pair_bonus: self.pair_bonus.unwrap_or(base.pair_bonus),
            pair_ratio: self.pair_ratio.unwrap_or(base.pair_ratio),
            triple_bonus: self.triple_bonus.unwrap_or(base.triple_bonus),
            triple_ratio: self.triple_ratio.unwrap_or(base.triple_ratio),
            corner_weight: self.corner_weight.unwrap_or(base.corner_weight),
            side_weight: self.side_weight.unwrap_or(base.side_weight),
            center_weight: self.center_weight.unwrap_or(base.center_weight),
            opponent_weight: self.opponent_weight.unwrap_or(base.opponent_weight),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScoringFile {
    local: ScoringOverrides,
    meta: ScoringOverrides,
}

impl From<ScoringFile> for Scoring {
    fn from(file: ScoringFile) -> Self {
        Scoring {
            local: file.local.apply(ScoringConfig::local()),
            meta: file.meta.apply(ScoringConfig::meta()),
        }
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring {
            local: ScoringConfig::local(),
            meta: ScoringConfig::meta(),
        }
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth (difficulty)
    pub search_depth: i32,
    /// Minimum time between requesting and committing a computer move
    pub pacing_ms: u64,
    /// Seed for tie-breaking; random when absent
    pub seed: Option<u64>,
    pub scoring: Scoring,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_depth: DEFAULT_DEPTH,
            pacing_ms: DEFAULT_PACING_MS,
            seed: None,
            scoring: Scoring::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DEPTH).contains(&self.search_depth) {
            return Err(ConfigError::Validation(format!(
                "search_depth must be in [1, {MAX_DEPTH}]"
            )));
        }
        self.scoring.local.validate("scoring.local")?;
        self.scoring.meta.validate("scoring.meta")?;
        Ok(())
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
