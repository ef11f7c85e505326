//! Centralized balance and tuning constants for Dream League match logic.
//!
//! Weights that define the rating math live here; values a league operator may want to tune
//! per deployment (event counts, upset chance, ...) live in [`crate::config::SimulationConfig`].

// Attribute weights --------------------------------------------------------
pub(crate) const WEIGHT_MECHANICAL: f64 = 0.25;
pub(crate) const WEIGHT_GAME_KNOWLEDGE: f64 = 0.25;
pub(crate) const WEIGHT_TEAM_COMMUNICATION: f64 = 0.20;
pub(crate) const WEIGHT_ADAPTABILITY: f64 = 0.15;
pub(crate) const WEIGHT_CONSISTENCY: f64 = 0.10;
pub(crate) const WEIGHT_FORM: f64 = 0.05;
pub(crate) const DEFAULT_OPTIONAL_ATTRIBUTE: f64 = 50.0;
pub(crate) const ATTRIBUTE_SCALE: f64 = 100.0;

// Synergy ------------------------------------------------------------------
pub(crate) const SYNERGY_MULTIPLIER_BASE: f64 = 0.8;
pub(crate) const SYNERGY_MULTIPLIER_SPAN: f64 = 0.4;

// Phases -------------------------------------------------------------------
pub(crate) const PHASE_OFFSET_EARLY: u32 = 0;
pub(crate) const PHASE_OFFSET_MID: u32 = 15;
pub(crate) const PHASE_OFFSET_LATE: u32 = 25;
pub(crate) const IMPACT_MIN: u8 = 1;
pub(crate) const IMPACT_MAX: u8 = 3;

// Match stats --------------------------------------------------------------
pub(crate) const DURATION_PADDING_MINUTES: u32 = 5;
pub(crate) const DEFAULT_DURATION_MINUTES: u32 = 30;
pub(crate) const PERFORMANCE_BASE_SCALE: f64 = 7.0;
pub(crate) const PERFORMANCE_NOISE_MAX: f64 = 3.0;
pub(crate) const PERFORMANCE_CEILING: f64 = 10.0;
pub(crate) const MIN_DEATHS: u32 = 1;

pub(crate) const GOLD_EARNED_BASE: f64 = 5_000.0;
pub(crate) const GOLD_EARNED_PER_POINT: f64 = 500.0;
pub(crate) const GOLD_EARNED_NOISE: f64 = 2_000.0;
pub(crate) const GOLD_SPENT_BASE: f64 = 4_500.0;
pub(crate) const GOLD_SPENT_PER_POINT: f64 = 500.0;
pub(crate) const GOLD_SPENT_NOISE: f64 = 1_800.0;
pub(crate) const DAMAGE_DEALT_BASE: f64 = 10_000.0;
pub(crate) const DAMAGE_DEALT_PER_POINT: f64 = 3_000.0;
pub(crate) const DAMAGE_DEALT_NOISE: f64 = 5_000.0;
pub(crate) const DAMAGE_TAKEN_BASE: f64 = 8_000.0;
pub(crate) const DAMAGE_TAKEN_PER_MISSING_POINT: f64 = 1_000.0;
pub(crate) const DAMAGE_TAKEN_NOISE: f64 = 4_000.0;
pub(crate) const VISION_BASE: f64 = 10.0;
pub(crate) const VISION_PER_POINT: f64 = 3.0;
pub(crate) const VISION_NOISE: f64 = 5.0;

// Commentary ---------------------------------------------------------------
pub(crate) const EXCITEMENT_MAX: u8 = 5;
pub(crate) const EXCITEMENT_INTRO: u8 = 4;
pub(crate) const EXCITEMENT_CONCLUSION: u8 = 5;
pub(crate) const EXCITEMENT_MVP: u8 = 4;

// Voice profile ------------------------------------------------------------
pub(crate) const VOICE_VOLUME_BASE: f32 = 0.6;
pub(crate) const VOICE_VOLUME_MAX: f32 = 1.0;
pub(crate) const VOICE_RATE_BASE: f32 = 0.9;
pub(crate) const VOICE_RATE_MAX: f32 = 1.3;
pub(crate) const VOICE_PITCH_BASE: f32 = 0.8;
pub(crate) const VOICE_PITCH_MAX: f32 = 1.2;
pub(crate) const VOICE_STEP_PER_EXCITEMENT: f32 = 0.1;

// Progression --------------------------------------------------------------
pub(crate) const EXP_BASE_WIN: f64 = 100.0;
pub(crate) const EXP_BASE_LOSS: f64 = 50.0;
pub(crate) const EXP_KILL_CONTRIBUTION: f64 = 0.05;
pub(crate) const EXP_MVP_BONUS: f64 = 0.25;
pub(crate) const STAT_CHANGE_WIN: f64 = 2.0;
pub(crate) const STAT_CHANGE_LOSS: f64 = -1.0;
pub(crate) const STAT_CHANGE_NOISE: i32 = 2;
pub(crate) const STAT_CHANGE_MIN: i32 = -3;
pub(crate) const STAT_CHANGE_MAX: i32 = 5;
pub(crate) const FORM_CHANGE_WIN_MIN: i32 = 3;
pub(crate) const FORM_CHANGE_WIN_MAX: i32 = 10;
pub(crate) const FORM_CHANGE_LOSS_MIN: i32 = -7;
pub(crate) const FORM_CHANGE_LOSS_MAX: i32 = 2;
pub(crate) const SKILL_FLOOR: f64 = 1.0;
pub(crate) const FORM_FLOOR: f64 = 0.0;
