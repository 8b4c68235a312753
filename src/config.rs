use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::infra::{Pathfinder, UnknownPolicy};
use crate::state::ArenaState;

/// Evaluator weights for the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Weights {
    pub gem: f64,
    pub danger: f64,
    pub center: f64,
    pub exploration: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            gem: 10.0,
            danger: 20.0,
            center: 1.0,
            exploration: 1.0,
        }
    }
}

impl Weights {
    fn iter(&self) -> [(&'static str, f64); 4] {
        [
            ("gem", self.gem),
            ("danger", self.danger),
            ("center", self.center),
            ("exploration", self.exploration),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaDimensions {
    pub width: i32,
    pub height: i32,
}

/// Read-only bot configuration. Every key is optional; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BotConfig {
    /// Strategy used while gems are reachable (or always, when not adaptive).
    pub strategy: String,
    /// Strategy used in EXPLORING mode.
    pub exploring_strategy: String,
    /// Switch between COLLECTING and EXPLORING based on gem reachability.
    pub adaptive: bool,
    /// Extra consecutive turns without a reachable gem before switching to EXPLORING.
    pub explore_hysteresis: u32,
    pub weights: Weights,
    /// Path distance from an enemy that counts as threatened.
    pub threat_radius: u32,
    /// Optimistic (`true`) or strict (`false`) BFS over unknown cells.
    pub unknown_traversable: bool,
    /// Manhattan window used to count cells a move would reveal.
    pub exploration_radius: u32,
    /// Cap on BFS expansions per search.
    pub search_limit: usize,
    /// Turns slower than this are reported.
    pub turn_budget_ms: u64,
    /// Used when the protocol does not announce the arena size.
    pub arena: Option<ArenaDimensions>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            strategy: "advanced_greedy".to_string(),
            exploring_strategy: "hidden_exploration".to_string(),
            adaptive: true,
            explore_hysteresis: 0,
            weights: Weights::default(),
            threat_radius: 2,
            unknown_traversable: true,
            exploration_radius: 1,
            search_limit: Pathfinder::DEFAULT_SEARCH_LIMIT,
            turn_budget_ms: 100,
            arena: None,
        }
    }
}

impl BotConfig {
    /// Largest accepted `exploration_radius`.
    pub const MAX_EXPLORATION_RADIUS: u32 = 32;
    /// Largest accepted `threat_radius`.
    pub const MAX_THREAT_RADIUS: u32 = 64;

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in self.weights.iter() {
            if !weight.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "weight '{}' must be finite, got {}",
                    name, weight
                )));
            }
        }
        if self.search_limit == 0 {
            return Err(ConfigError::Invalid("search_limit must be positive".to_string()));
        }
        if self.exploration_radius > Self::MAX_EXPLORATION_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "exploration_radius must be at most {}, got {}",
                Self::MAX_EXPLORATION_RADIUS,
                self.exploration_radius
            )));
        }
        if self.threat_radius > Self::MAX_THREAT_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "threat_radius must be at most {}, got {}",
                Self::MAX_THREAT_RADIUS,
                self.threat_radius
            )));
        }
        if let Some(arena) = self.arena {
            ArenaState::check_dimensions(arena.width, arena.height)
                .map_err(|err| ConfigError::Invalid(format!("arena: {}", err)))?;
        }
        Ok(())
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        UnknownPolicy::from_traversable(self.unknown_traversable)
    }

    pub fn pathfinder(&self) -> Pathfinder {
        Pathfinder::new(self.unknown_policy(), self.search_limit)
    }
}
