// Engine configuration loading and validation (engine.toml).
//
// Every tunable the scoring model exposes lives here so product-side
// recalibration (threshold shifts, weight splits) never needs a code change.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Team strength estimation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    /// How many of a team's top-form players feed its strength rating.
    pub top_n: usize,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self { top_n: 12 }
    }
}

/// Fixture difficulty classification parameters.
///
/// The classifier works on the average-form scale, so the thresholds and
/// nudges below are all denominated in average form points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Multiplier applied to the centered table-strength term. Kept gentle
    /// so league standing nudges the form signal without overriding it.
    pub table_weight: f64,
    /// Added to an opponent's threat when the observing team plays away.
    pub away_bonus: f64,
    /// Subtracted from an opponent's threat when the observing team plays
    /// at home.
    pub home_discount: f64,
    /// Ascending tier boundaries: below the first is tier 1, above the last
    /// is tier 5. Calibrated so tier 3 spans a league-average opponent.
    pub tier_thresholds: [f64; 4],
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            table_weight: 0.1,
            away_bonus: 0.3,
            home_discount: 0.2,
            tier_thresholds: [2.0, 3.0, 4.0, 5.0],
        }
    }
}

/// Transfer index aggregation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Forward window length in gameweeks, starting at the next upcoming
    /// gameweek and clipped to the season's final one.
    pub lookahead: u32,
    /// Maximum plausible form value; player form is normalized against it.
    pub form_ceiling: f64,
    /// Weight of normalized player form in the composite index.
    pub form_weight: f64,
    /// Weight of normalized fixture ease in the composite index.
    /// `form_weight + fixture_weight` must equal 1.
    pub fixture_weight: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            lookahead: 5,
            form_ceiling: 10.0,
            form_weight: 0.5,
            fixture_weight: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strength: StrengthConfig,
    pub difficulty: DifficultyConfig,
    pub index: IndexConfig,
}

/// Tolerance for the weight-sum check, so TOML like `0.6`/`0.4` passes.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.to_path_buf(),
            })?;
        let config: EngineConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the internal consistency rules every consumer relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strength.top_n == 0 {
            return Err(ConfigError::ValidationError {
                field: "strength.top_n".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.index.lookahead == 0 {
            return Err(ConfigError::ValidationError {
                field: "index.lookahead".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.index.form_ceiling <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: "index.form_ceiling".into(),
                message: format!("must be > 0, got {}", self.index.form_ceiling),
            });
        }

        for (name, val) in [
            ("index.form_weight", self.index.form_weight),
            ("index.fixture_weight", self.index.fixture_weight),
        ] {
            if !(0.0..=1.0).contains(&val) {
                return Err(ConfigError::ValidationError {
                    field: name.into(),
                    message: format!("must be between 0.0 and 1.0 inclusive, got {val}"),
                });
            }
        }

        let weight_sum = self.index.form_weight + self.index.fixture_weight;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::ValidationError {
                field: "index.form_weight".into(),
                message: format!(
                    "form_weight + fixture_weight must equal 1.0, got {weight_sum}"
                ),
            });
        }

        if self.difficulty.table_weight < 0.0 {
            return Err(ConfigError::ValidationError {
                field: "difficulty.table_weight".into(),
                message: format!("must be >= 0, got {}", self.difficulty.table_weight),
            });
        }

        let t = &self.difficulty.tier_thresholds;
        if !t.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::ValidationError {
                field: "difficulty.tier_thresholds".into(),
                message: format!("must be strictly ascending, got {t:?}"),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
