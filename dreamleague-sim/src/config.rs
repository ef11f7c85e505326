//! Tunable balance parameters for the match simulation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{PHASE_OFFSET_EARLY, PHASE_OFFSET_LATE, PHASE_OFFSET_MID};
use crate::events::GamePhase;

const DEFAULT_SIMULATION_DATA: &str = include_str!("../assets/data/simulation.json");

/// Errors raised when simulation configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be greater than {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} bounds inverted (min {min:.2} > max {max:.2})")]
    BoundsInverted {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("phase offsets must be ascending (early {early}, mid {mid}, late {late})")]
    PhaseOrder { early: u32, mid: u32, late: u32 },
    #[error("at least one commentator name is required")]
    MissingCommentators,
}

/// Minute at which each phase's events start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseOffsets {
    #[serde(default = "default_early_offset")]
    pub early: u32,
    #[serde(default = "default_mid_offset")]
    pub mid: u32,
    #[serde(default = "default_late_offset")]
    pub late: u32,
}

impl PhaseOffsets {
    #[must_use]
    pub const fn for_phase(&self, phase: GamePhase) -> u32 {
        match phase {
            GamePhase::Early => self.early,
            GamePhase::Mid => self.mid,
            GamePhase::Late => self.late,
        }
    }
}

impl Default for PhaseOffsets {
    fn default() -> Self {
        Self {
            early: PHASE_OFFSET_EARLY,
            mid: PHASE_OFFSET_MID,
            late: PHASE_OFFSET_LATE,
        }
    }
}

/// Balance knobs read by the engine, event generator, and commentator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_events_per_phase")]
    pub events_per_phase: u32,
    #[serde(default)]
    pub phase_offsets: PhaseOffsets,
    /// Inclusive upper bound of the per-event minute jitter.
    #[serde(default = "default_time_jitter_max")]
    pub time_jitter_max: u32,
    #[serde(default = "default_probability_floor")]
    pub probability_floor: f64,
    #[serde(default = "default_probability_ceiling")]
    pub probability_ceiling: f64,
    /// Overall-rating gap that shifts the favour probability by 1.0.
    #[serde(default = "default_advantage_scale")]
    pub advantage_scale: f64,
    #[serde(default = "default_score_advantage_divisor")]
    pub score_advantage_divisor: f64,
    #[serde(default = "default_upset_chance")]
    pub upset_chance: f64,
    #[serde(default = "default_upset_bonus_min")]
    pub upset_bonus_min: u32,
    #[serde(default = "default_upset_bonus_max")]
    pub upset_bonus_max: u32,
    #[serde(default = "default_performance_jitter_min")]
    pub performance_jitter_min: f64,
    #[serde(default = "default_performance_jitter_max")]
    pub performance_jitter_max: f64,
    #[serde(default = "default_commentators")]
    pub commentators: Vec<String>,
}

impl SimulationConfig {
    /// Parse a configuration document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_SIMULATION_DATA).unwrap_or_default()
    }

    /// Inclusive favour probability bounds as a pair.
    #[must_use]
    pub const fn probability_bounds(&self) -> (f64, f64) {
        (self.probability_floor, self.probability_ceiling)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_probabilities()?;
        self.validate_score()?;
        self.validate_jitter()?;
        self.validate_phases()?;
        if self.commentators.iter().all(|name| name.trim().is_empty()) {
            return Err(ConfigError::MissingCommentators);
        }
        Ok(())
    }

    fn validate_probabilities(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("probability_floor", self.probability_floor),
            ("probability_ceiling", self.probability_ceiling),
            ("upset_chance", self.upset_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        if self.probability_floor > self.probability_ceiling {
            return Err(ConfigError::BoundsInverted {
                field: "probability",
                min: self.probability_floor,
                max: self.probability_ceiling,
            });
        }
        Ok(())
    }

    fn validate_score(&self) -> Result<(), ConfigError> {
        if self.score_advantage_divisor <= 0.0 || self.score_advantage_divisor.is_nan() {
            return Err(ConfigError::MinViolation {
                field: "score_advantage_divisor",
                min: 0.0,
                value: self.score_advantage_divisor,
            });
        }
        if self.advantage_scale <= 0.0 || self.advantage_scale.is_nan() {
            return Err(ConfigError::MinViolation {
                field: "advantage_scale",
                min: 0.0,
                value: self.advantage_scale,
            });
        }
        if self.upset_bonus_min > self.upset_bonus_max {
            return Err(ConfigError::BoundsInverted {
                field: "upset_bonus",
                min: f64::from(self.upset_bonus_min),
                max: f64::from(self.upset_bonus_max),
            });
        }
        Ok(())
    }

    fn validate_jitter(&self) -> Result<(), ConfigError> {
        if self.performance_jitter_min <= 0.0 || self.performance_jitter_min.is_nan() {
            return Err(ConfigError::MinViolation {
                field: "performance_jitter_min",
                min: 0.0,
                value: self.performance_jitter_min,
            });
        }
        if self.performance_jitter_min > self.performance_jitter_max {
            return Err(ConfigError::BoundsInverted {
                field: "performance_jitter",
                min: self.performance_jitter_min,
                max: self.performance_jitter_max,
            });
        }
        Ok(())
    }

    fn validate_phases(&self) -> Result<(), ConfigError> {
        let PhaseOffsets { early, mid, late } = self.phase_offsets;
        if early > mid || mid > late {
            return Err(ConfigError::PhaseOrder { early, mid, late });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            events_per_phase: default_events_per_phase(),
            phase_offsets: PhaseOffsets::default(),
            time_jitter_max: default_time_jitter_max(),
            probability_floor: default_probability_floor(),
            probability_ceiling: default_probability_ceiling(),
            advantage_scale: default_advantage_scale(),
            score_advantage_divisor: default_score_advantage_divisor(),
            upset_chance: default_upset_chance(),
            upset_bonus_min: default_upset_bonus_min(),
            upset_bonus_max: default_upset_bonus_max(),
            performance_jitter_min: default_performance_jitter_min(),
            performance_jitter_max: default_performance_jitter_max(),
            commentators: default_commentators(),
        }
    }
}

const fn default_early_offset() -> u32 {
    PHASE_OFFSET_EARLY
}

const fn default_mid_offset() -> u32 {
    PHASE_OFFSET_MID
}

const fn default_late_offset() -> u32 {
    PHASE_OFFSET_LATE
}

const fn default_events_per_phase() -> u32 {
    5
}

const fn default_time_jitter_max() -> u32 {
    4
}

const fn default_probability_floor() -> f64 {
    0.3
}

const fn default_probability_ceiling() -> f64 {
    0.7
}

const fn default_advantage_scale() -> f64 {
    100.0
}

const fn default_score_advantage_divisor() -> f64 {
    10.0
}

const fn default_upset_chance() -> f64 {
    0.2
}

const fn default_upset_bonus_min() -> u32 {
    1
}

const fn default_upset_bonus_max() -> u32 {
    3
}

const fn default_performance_jitter_min() -> f64 {
    0.9
}

const fn default_performance_jitter_max() -> f64 {
    1.1
}

fn default_commentators() -> Vec<String> {
    vec![String::from("PastryTime"), String::from("CaptainFlowers")]
}
