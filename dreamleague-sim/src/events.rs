//! Phase-ordered match events biased by the performance gap between teams.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::config::SimulationConfig;
use crate::constants::{IMPACT_MAX, IMPACT_MIN};
use crate::performance::TeamPerformance;
use crate::roster::{Team, TeamSide};

const DEFAULT_EVENT_TEMPLATES: &str = include_str!("../assets/data/event_templates.json");
const FALLBACK_TEMPLATE: &str = "{team} gains the upper hand";
const TEAM_PLACEHOLDER: &str = "{team}";

/// Stage of the match an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamePhase {
    #[serde(rename = "early_game")]
    Early,
    #[serde(rename = "mid_game")]
    Mid,
    #[serde(rename = "late_game")]
    Late,
}

impl GamePhase {
    pub const ALL: [Self; 3] = [Self::Early, Self::Mid, Self::Late];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Early => "early_game",
            Self::Mid => "mid_game",
            Self::Late => "late_game",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Objective,
    Teamfight,
    Play,
}

impl EventKind {
    pub const ALL: [Self; 3] = [Self::Objective, Self::Teamfight, Self::Play];
}

/// One notable moment of a simulated match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Minute of the match.
    pub time: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub phase: GamePhase,
    pub description: String,
    pub favored_team: TeamSide,
    /// 1..=3
    pub impact: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KindTemplates {
    #[serde(default)]
    pub objective: Vec<String>,
    #[serde(default)]
    pub teamfight: Vec<String>,
    #[serde(default)]
    pub play: Vec<String>,
}

impl KindTemplates {
    #[must_use]
    pub fn for_kind(&self, kind: EventKind) -> &[String] {
        match kind {
            EventKind::Objective => &self.objective,
            EventKind::Teamfight => &self.teamfight,
            EventKind::Play => &self.play,
        }
    }
}

/// Description templates keyed by phase and event kind; `{team}` marks the favoured team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventTemplates {
    #[serde(default)]
    pub early_game: KindTemplates,
    #[serde(default)]
    pub mid_game: KindTemplates,
    #[serde(default)]
    pub late_game: KindTemplates,
}

impl EventTemplates {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_EVENT_TEMPLATES).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<EventTemplates> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a template catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn pool(&self, phase: GamePhase, kind: EventKind) -> &[String] {
        let phase_templates = match phase {
            GamePhase::Early => &self.early_game,
            GamePhase::Mid => &self.mid_game,
            GamePhase::Late => &self.late_game,
        };
        phase_templates.for_kind(kind)
    }
}

/// Both sides of a match with their computed performance.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub team_a: &'a Team,
    pub team_b: &'a Team,
    pub perf_a: &'a TeamPerformance,
    pub perf_b: &'a TeamPerformance,
}

impl Matchup<'_> {
    #[must_use]
    pub const fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => self.team_a,
            TeamSide::B => self.team_b,
        }
    }

    /// Probability that an event favours team A.
    #[must_use]
    pub fn favour_probability(&self, config: &SimulationConfig) -> f64 {
        let advantage = self.perf_a.overall - self.perf_b.overall;
        (0.5 + advantage / config.advantage_scale)
            .max(config.probability_floor)
            .min(config.probability_ceiling)
            .clamp(0.0, 1.0)
    }
}

/// Generate exactly `count` events for `phase`, sorted by time.
pub fn generate_phase_events<R>(
    phase: GamePhase,
    count: u32,
    matchup: &Matchup<'_>,
    templates: &EventTemplates,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<SimulationEvent>
where
    R: Rng + ?Sized,
{
    let favour_a = matchup.favour_probability(config);
    let offset = config.phase_offsets.for_phase(phase);

    let mut events: Vec<SimulationEvent> = (0..count)
        .map(|index| {
            let kind = EventKind::ALL[rng.gen_range(0..EventKind::ALL.len())];
            let favored_team = if rng.gen_bool(favour_a) {
                TeamSide::A
            } else {
                TeamSide::B
            };
            let template = templates
                .pool(phase, kind)
                .choose(rng)
                .map_or(FALLBACK_TEMPLATE, String::as_str);
            let description =
                template.replacen(TEAM_PLACEHOLDER, &matchup.team(favored_team).name, 1);
            let jitter = rng.gen_range(0..=config.time_jitter_max);
            let impact = rng.gen_range(IMPACT_MIN..=IMPACT_MAX);
            SimulationEvent {
                time: offset.saturating_add(index).saturating_add(jitter),
                kind,
                phase,
                description,
                favored_team,
                impact,
            }
        })
        .collect();

    events.sort_by_key(|event| event.time);
    events
}

/// Generate every phase and merge into one time-ordered match log.
///
/// The merge sort is stable, so events sharing a minute keep their phase order.
pub fn generate_match_events<R>(
    matchup: &Matchup<'_>,
    templates: &EventTemplates,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<SimulationEvent>
where
    R: Rng + ?Sized,
{
    let mut events: Vec<SimulationEvent> = GamePhase::ALL
        .iter()
        .flat_map(|phase| {
            generate_phase_events(
                *phase,
                config.events_per_phase,
                matchup,
                templates,
                config,
                rng,
            )
        })
        .collect();
    events.sort_by_key(|event| event.time);
    events
}
