//! Match orchestration: performance, events, score, winner, and stats.
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::commentary::{Commentary, MatchCommentator};
use crate::config::{ConfigError, SimulationConfig};
use crate::error::SimulationError;
use crate::events::{EventKind, EventTemplates, Matchup, SimulationEvent, generate_match_events};
use crate::numbers::floor_f64_to_i32;
use crate::performance::{TeamPerformance, calculate_team_performance_with_jitter};
use crate::rng::{MatchStreams, SingleStream, Stream};
use crate::roster::{Player, Team, TeamId, TeamSide};
use crate::stats::{MatchStats, analyze_match_stats};

/// Engine output before narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_side: TeamSide,
    /// `[team A, team B]`
    pub score: [u32; 2],
    pub events: Vec<SimulationEvent>,
    pub stats: MatchStats,
    pub performance_a: TeamPerformance,
    pub performance_b: TeamPerformance,
}

impl MatchOutcome {
    #[must_use]
    pub const fn score_for(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::A => self.score[0],
            TeamSide::B => self.score[1],
        }
    }
}

/// Narrated match result handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    pub commentary: Vec<Commentary>,
}

/// Turns two rated rosters into a scored match.
#[derive(Debug, Clone)]
pub struct MatchSimulationEngine {
    config: SimulationConfig,
    templates: EventTemplates,
}

impl Default for MatchSimulationEngine {
    fn default() -> Self {
        Self {
            config: SimulationConfig::load_from_static(),
            templates: EventTemplates::default_catalog().clone(),
        }
    }
}

impl MatchSimulationEngine {
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            templates: EventTemplates::default_catalog().clone(),
        })
    }

    #[must_use]
    pub fn with_templates(mut self, templates: EventTemplates) -> Self {
        self.templates = templates;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate with every stage drawing from one injected generator.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InsufficientRoster`] when either roster is empty.
    pub fn simulate<R>(
        &self,
        team_a: &Team,
        team_b: &Team,
        roster_a: &[Player],
        roster_b: &[Player],
        rng: &mut R,
    ) -> Result<MatchOutcome, SimulationError>
    where
        R: RngCore,
    {
        self.simulate_streams(team_a, team_b, roster_a, roster_b, &mut SingleStream(rng))
    }

    /// Simulate with each stage drawing from its own stream.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InsufficientRoster`] when either roster is empty.
    pub fn simulate_streams<S>(
        &self,
        team_a: &Team,
        team_b: &Team,
        roster_a: &[Player],
        roster_b: &[Player],
        streams: &mut S,
    ) -> Result<MatchOutcome, SimulationError>
    where
        S: MatchStreams + ?Sized,
    {
        let sides = [(TeamSide::A, team_a, roster_a), (TeamSide::B, team_b, roster_b)];
        for (side, team, roster) in sides {
            if roster.is_empty() {
                return Err(SimulationError::InsufficientRoster {
                    side,
                    team: team.id.clone(),
                });
            }
        }

        let jitter = (
            self.config.performance_jitter_min,
            self.config.performance_jitter_max,
        );
        let perf_a = calculate_team_performance_with_jitter(
            team_a,
            roster_a,
            jitter,
            streams.stream(Stream::Performance),
        )?;
        let perf_b = calculate_team_performance_with_jitter(
            team_b,
            roster_b,
            jitter,
            streams.stream(Stream::Performance),
        )?;

        let matchup = Matchup {
            team_a,
            team_b,
            perf_a: &perf_a,
            perf_b: &perf_b,
        };
        let events = generate_match_events(
            &matchup,
            &self.templates,
            &self.config,
            streams.stream(Stream::Events),
        );

        let score = calculate_final_score(
            &events,
            &perf_a,
            &perf_b,
            &self.config,
            streams.stream(Stream::Score),
        );
        let winner_side = if score[0] >= score[1] {
            TeamSide::A
        } else {
            TeamSide::B
        };
        let (winner, loser) = match winner_side {
            TeamSide::A => (team_a, team_b),
            TeamSide::B => (team_b, team_a),
        };

        let stats = analyze_match_stats(
            &events,
            team_a,
            team_b,
            roster_a,
            roster_b,
            streams.stream(Stream::Stats),
        );
        debug!(
            "{} {}-{} {} ({} events, {} min)",
            team_a.id,
            score[0],
            score[1],
            team_b.id,
            events.len(),
            stats.duration
        );

        Ok(MatchOutcome {
            winner: winner.id.clone(),
            loser: loser.id.clone(),
            winner_side,
            score,
            events,
            stats,
            performance_a: perf_a,
            performance_b: perf_b,
        })
    }

    /// Simulate and narrate a match.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InsufficientRoster`] when either roster is empty.
    pub fn run_match<S>(
        &self,
        team_a: &Team,
        team_b: &Team,
        roster_a: &[Player],
        roster_b: &[Player],
        streams: &mut S,
    ) -> Result<MatchResult, SimulationError>
    where
        S: MatchStreams + ?Sized,
    {
        let outcome = self.simulate_streams(team_a, team_b, roster_a, roster_b, streams)?;
        let commentary = MatchCommentator::from_config(&self.config).generate_match_commentary(
            &outcome.events,
            team_a,
            team_b,
            Some(&outcome.stats),
            streams.stream(Stream::Commentary),
        );
        Ok(MatchResult {
            outcome,
            commentary,
        })
    }
}

/// Score from objectives plus the performance gap, floored at 1, with a chance of upset.
pub fn calculate_final_score<R>(
    events: &[SimulationEvent],
    perf_a: &TeamPerformance,
    perf_b: &TeamPerformance,
    config: &SimulationConfig,
    rng: &mut R,
) -> [u32; 2]
where
    R: Rng + ?Sized,
{
    let objectives = |side: TeamSide| {
        events
            .iter()
            .filter(|event| event.kind == EventKind::Objective && event.favored_team == side)
            .count()
    };
    let advantage = i64::from(floor_f64_to_i32(
        (perf_a.overall - perf_b.overall) / config.score_advantage_divisor,
    ));
    let base_a = i64::try_from(objectives(TeamSide::A)).unwrap_or(i64::MAX);
    let base_b = i64::try_from(objectives(TeamSide::B)).unwrap_or(i64::MAX);

    let clamp_score = |value: i64| u32::try_from(value.max(1)).unwrap_or(u32::MAX);
    let mut score_a = clamp_score(base_a.saturating_add(advantage));
    let mut score_b = clamp_score(base_b.saturating_sub(advantage));

    if rng.gen_bool(config.upset_chance.clamp(0.0, 1.0)) {
        let bonus = if config.upset_bonus_max > config.upset_bonus_min {
            rng.gen_range(config.upset_bonus_min..=config.upset_bonus_max)
        } else {
            config.upset_bonus_min
        };
        if score_a > score_b {
            score_b = score_b.saturating_add(bonus);
        } else {
            score_a = score_a.saturating_add(bonus);
        }
    }
    [score_a, score_b]
}
