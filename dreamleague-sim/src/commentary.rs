//! Caster-style narration derived from a match log.
//!
//! Commentary is a pure view over events and stats: it draws from its own random stream and
//! never feeds back into scores or box scores.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::config::SimulationConfig;
use crate::constants::{EXCITEMENT_CONCLUSION, EXCITEMENT_INTRO, EXCITEMENT_MAX, EXCITEMENT_MVP};
use crate::events::{EventKind, GamePhase, SimulationEvent};
use crate::roster::{Team, TeamSide};
use crate::stats::MatchStats;

const DEFAULT_COMMENTARY_DATA: &str = include_str!("../assets/data/commentary.json");
const DEFAULT_LEAD: &str = "PastryTime";
const DEFAULT_PARTNER: &str = "CaptainFlowers";

/// One narrated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary {
    pub time: u32,
    pub text: String,
    pub phase: GamePhase,
    /// 1..=5
    pub excitement: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenerPhrases {
    #[serde(default)]
    pub objective: Vec<String>,
    #[serde(default)]
    pub teamfight: Vec<String>,
    #[serde(default)]
    pub play: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImpactPhrases {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhaseColorPhrases {
    #[serde(default)]
    pub early_game: Vec<String>,
    #[serde(default)]
    pub mid_game: Vec<String>,
    #[serde(default)]
    pub late_game: Vec<String>,
}

/// Phrase pools and line templates used by [`MatchCommentator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommentaryPhrases {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub mvp: String,
    #[serde(default)]
    pub openers: OpenerPhrases,
    #[serde(default)]
    pub impact: ImpactPhrases,
    #[serde(default)]
    pub phase_color: PhaseColorPhrases,
}

impl CommentaryPhrases {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_COMMENTARY_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<CommentaryPhrases> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into phrase pools.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn openers(&self, kind: EventKind) -> &[String] {
        match kind {
            EventKind::Objective => &self.openers.objective,
            EventKind::Teamfight => &self.openers.teamfight,
            EventKind::Play => &self.openers.play,
        }
    }

    fn impact(&self, impact: u8) -> &[String] {
        match impact {
            0 | 1 => &self.impact.low,
            2 => &self.impact.medium,
            _ => &self.impact.high,
        }
    }

    fn phase_color(&self, phase: GamePhase) -> &[String] {
        match phase {
            GamePhase::Early => &self.phase_color.early_game,
            GamePhase::Mid => &self.phase_color.mid_game,
            GamePhase::Late => &self.phase_color.late_game,
        }
    }
}

/// Excitement for an event line: impact, +1 late, +1 teamfight, capped at 5.
#[must_use]
pub fn excitement_for(event: &SimulationEvent) -> u8 {
    let mut excitement = event.impact;
    if event.phase == GamePhase::Late {
        excitement = excitement.saturating_add(1);
    }
    if event.kind == EventKind::Teamfight {
        excitement = excitement.saturating_add(1);
    }
    excitement.min(EXCITEMENT_MAX)
}

fn pick<'a, R>(pool: &'a [String], rng: &mut R) -> &'a str
where
    R: Rng + ?Sized,
{
    pool.choose(rng).map_or("", String::as_str)
}

/// Turns events and stats into a time-ordered list of commentary lines.
#[derive(Debug, Clone)]
pub struct MatchCommentator<'p> {
    commentators: Vec<String>,
    phrases: &'p CommentaryPhrases,
}

impl Default for MatchCommentator<'static> {
    fn default() -> Self {
        Self::new(vec![String::from(DEFAULT_LEAD), String::from(DEFAULT_PARTNER)])
    }
}

impl MatchCommentator<'static> {
    /// Commentator pair over the embedded phrase catalog.
    #[must_use]
    pub fn new(commentators: Vec<String>) -> Self {
        Self {
            commentators,
            phrases: CommentaryPhrases::default_catalog(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.commentators.clone())
    }
}

impl<'p> MatchCommentator<'p> {
    /// Commentator pair over caller-supplied phrase pools.
    #[must_use]
    pub const fn with_phrases(commentators: Vec<String>, phrases: &'p CommentaryPhrases) -> Self {
        Self {
            commentators,
            phrases,
        }
    }

    #[must_use]
    pub fn commentators(&self) -> &[String] {
        &self.commentators
    }

    fn lead(&self) -> &str {
        self.commentators.first().map_or(DEFAULT_LEAD, String::as_str)
    }

    fn partner(&self) -> &str {
        self.commentators
            .get(1)
            .map_or(DEFAULT_PARTNER, String::as_str)
    }

    /// Narrate a match: intro, one line per event, and closing lines when `stats` is present.
    pub fn generate_match_commentary<R>(
        &self,
        events: &[SimulationEvent],
        team_a: &Team,
        team_b: &Team,
        stats: Option<&MatchStats>,
        rng: &mut R,
    ) -> Vec<Commentary>
    where
        R: Rng + ?Sized,
    {
        let mut lines = Vec::with_capacity(events.len() + 3);
        lines.push(Commentary {
            time: 0,
            text: self
                .phrases
                .intro
                .replace("{team_a}", &team_a.name)
                .replace("{team_b}", &team_b.name)
                .replace("{lead}", self.lead())
                .replace("{partner}", self.partner()),
            phase: GamePhase::Early,
            excitement: EXCITEMENT_INTRO,
        });

        for event in events {
            lines.push(Commentary {
                time: event.time,
                text: self.describe_event(event, team_a, team_b, rng),
                phase: event.phase,
                excitement: excitement_for(event),
            });
        }

        if let Some(stats) = stats {
            self.push_closing_lines(&mut lines, stats, team_a, team_b);
        }
        lines
    }

    fn describe_event<R>(
        &self,
        event: &SimulationEvent,
        team_a: &Team,
        team_b: &Team,
        rng: &mut R,
    ) -> String
    where
        R: Rng + ?Sized,
    {
        let (team, opponent) = match event.favored_team {
            TeamSide::A => (team_a, team_b),
            TeamSide::B => (team_b, team_a),
        };
        let opener = pick(self.phrases.openers(event.kind), rng)
            .replace("{team}", &team.name)
            .replace("{opponent}", &opponent.name);
        let mut text = opener;
        text.push_str(&event.description.to_lowercase());
        text.push_str(pick(self.phrases.impact(event.impact), rng));
        text.push_str(pick(self.phrases.phase_color(event.phase), rng));
        text
    }

    fn push_closing_lines(
        &self,
        lines: &mut Vec<Commentary>,
        stats: &MatchStats,
        team_a: &Team,
        team_b: &Team,
    ) {
        let a = stats.team_stats.side(TeamSide::A);
        let b = stats.team_stats.side(TeamSide::B);
        // Team A must strictly out-dominate; a level count credits team B.
        let leader = if a.dominance() > b.dominance() {
            TeamSide::A
        } else {
            TeamSide::B
        };
        let leader_team = match leader {
            TeamSide::A => team_a,
            TeamSide::B => team_b,
        };

        lines.push(Commentary {
            time: stats.duration,
            text: self
                .phrases
                .conclusion
                .replace("{team}", &leader_team.name)
                .replace("{duration}", &stats.duration.to_string()),
            phase: GamePhase::Late,
            excitement: EXCITEMENT_CONCLUSION,
        });

        if let Some(mvp) = &stats.team_stats.side(leader).mvp {
            lines.push(Commentary {
                time: stats.duration.saturating_add(1),
                text: self
                    .phrases
                    .mvp
                    .replace("{player}", &mvp.name)
                    .replace("{position}", mvp.position.label()),
                phase: GamePhase::Late,
                excitement: EXCITEMENT_MVP,
            });
        }
    }
}
