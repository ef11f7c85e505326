//! Dream League Match Engine
//!
//! Platform-agnostic esports match simulation: rated rosters in, a scored, narrated, and
//! statistically detailed match out. Roster lookup, result recording, and speech synthesis are
//! external collaborators reached through traits.

pub mod audio;
pub mod commentary;
pub mod config;
mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod numbers;
pub mod performance;
pub mod progression;
pub mod record;
pub mod rng;
pub mod roster;
pub mod seed;
pub mod stats;
pub mod tournament;

use log::info;
use thiserror::Error;

#[cfg(feature = "async")]
pub use audio::{AudioNarrator, NarrationOptions, narrate_commentary};
pub use audio::VoiceProfile;
pub use commentary::{Commentary, CommentaryPhrases, MatchCommentator, excitement_for};
pub use config::{ConfigError, PhaseOffsets, SimulationConfig};
pub use engine::{MatchOutcome, MatchResult, MatchSimulationEngine, calculate_final_score};
pub use error::SimulationError;
pub use events::{
    EventKind, EventTemplates, GamePhase, Matchup, SimulationEvent, generate_match_events,
    generate_phase_events,
};
pub use performance::{TeamPerformance, calculate_team_performance};
pub use progression::{PlayerProgress, apply_progress, compute_progress, progress_for_match};
pub use record::{MatchRecord, ResultRecorder, StatsEncoding};
pub use rng::{MatchRng, MatchStreams, Stream, derive_stream_seed};
pub use roster::{Player, PlayerAttributes, PlayerId, PlayerRef, Position, Team, TeamId, TeamSide};
pub use seed::{
    MatchKind, ShareCode, ShareCodeError, decode_to_seed, encode_friendly,
    generate_code_from_entropy, parse_share_code,
};
pub use stats::{
    MatchStats, PlayerPerformance, TeamMatchStats, TeamStatsPair, analyze_match_stats, select_mvp,
};
pub use tournament::{Bracket, BracketMatch, BracketStatus, TournamentError};

/// Simulate and narrate one match from an explicit seed.
///
/// Each pipeline stage draws from its own stream derived from `seed`, so the same inputs and seed
/// always produce the same result.
///
/// # Errors
///
/// Returns [`SimulationError::InsufficientRoster`] when either roster is empty.
pub fn simulate_match(
    team_a: &Team,
    team_b: &Team,
    roster_a: &[Player],
    roster_b: &[Player],
    seed: u64,
) -> Result<MatchResult, SimulationError> {
    let mut streams = MatchRng::from_user_seed(seed);
    MatchSimulationEngine::default().run_match(team_a, team_b, roster_a, roster_b, &mut streams)
}

/// Trait for abstracting team and roster lookup.
/// Platform-specific implementations (ledger accounts, fixtures, ...) should provide this.
pub trait RosterProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a team snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the team cannot be fetched.
    fn load_team(&self, team: &TeamId) -> Result<Team, Self::Error>;

    /// Load the players on `team`'s roster.
    ///
    /// # Errors
    ///
    /// Returns an error if any player cannot be fetched.
    fn load_roster(&self, team: &Team) -> Result<Vec<Player>, Self::Error>;
}

/// Failures surfaced by [`MatchService`].
#[derive(Debug, Error)]
pub enum ServiceError<PE, RE>
where
    PE: std::error::Error + 'static,
    RE: std::error::Error + 'static,
{
    #[error("roster provider failed: {0}")]
    Provider(#[source] PE),
    #[error("result recorder failed: {0}")]
    Recorder(#[source] RE),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error("failed to encode match stats: {0}")]
    Encoding(#[from] serde_json::Error),
}

type ServiceResult<T, P, R> =
    Result<T, ServiceError<<P as RosterProvider>::Error, <R as ResultRecorder>::Error>>;

/// Binds roster lookup and result recording around the match engine.
pub struct MatchService<P, R>
where
    P: RosterProvider,
    R: ResultRecorder,
{
    provider: P,
    recorder: R,
    engine: MatchSimulationEngine,
    encoding: StatsEncoding,
}

impl<P, R> MatchService<P, R>
where
    P: RosterProvider,
    R: ResultRecorder,
{
    /// Create a service over the default engine and score-pair encoding.
    pub fn new(provider: P, recorder: R) -> Self {
        Self {
            provider,
            recorder,
            engine: MatchSimulationEngine::default(),
            encoding: StatsEncoding::default(),
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: MatchSimulationEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub const fn with_encoding(mut self, encoding: StatsEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub const fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Fetch both teams, simulate, narrate, and record the result.
    ///
    /// # Errors
    ///
    /// Returns an error if lookup, simulation, encoding, or recording fails. Nothing is recorded
    /// when an earlier step fails.
    pub fn play_match(
        &self,
        match_id: &str,
        team_a_id: &TeamId,
        team_b_id: &TeamId,
        seed: u64,
    ) -> ServiceResult<MatchResult, P, R> {
        let team_a = self
            .provider
            .load_team(team_a_id)
            .map_err(ServiceError::Provider)?;
        let team_b = self
            .provider
            .load_team(team_b_id)
            .map_err(ServiceError::Provider)?;
        let roster_a = self
            .provider
            .load_roster(&team_a)
            .map_err(ServiceError::Provider)?;
        let roster_b = self
            .provider
            .load_roster(&team_b)
            .map_err(ServiceError::Provider)?;

        let mut streams = MatchRng::from_user_seed(seed);
        let result = self
            .engine
            .run_match(&team_a, &team_b, &roster_a, &roster_b, &mut streams)?;
        let record = MatchRecord::from_result(match_id, &result, self.encoding)?;
        self.recorder
            .record_match(&record)
            .map_err(ServiceError::Recorder)?;
        info!(
            "{match_id}: {} beat {} {}-{}",
            result.outcome.winner, result.outcome.loser, record.score[0], record.score[1]
        );
        Ok(result)
    }

    /// Play every pending match of the bracket's current round and record the winners.
    ///
    /// Match `i` of the round is seeded from `round_seed` and `i`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing match; matches already played stay recorded.
    pub fn play_tournament_round(
        &self,
        bracket: &mut Bracket,
        round_seed: u64,
    ) -> ServiceResult<Vec<MatchResult>, P, R> {
        if bracket.status() == BracketStatus::Completed {
            return Err(TournamentError::BracketCompleted.into());
        }
        let pending: Vec<(String, TeamId, TeamId)> = bracket
            .pending_matches()
            .iter()
            .map(|m| (m.match_id.clone(), m.team_a.clone(), m.team_b.clone()))
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        for (index, (match_id, team_a, team_b)) in (0_u64..).zip(pending) {
            let seed = derive_stream_seed(round_seed, &index.to_le_bytes());
            let result = self.play_match(&match_id, &team_a, &team_b, seed)?;
            let score = result.outcome.score.map(numbers::saturate_u32_to_u8);
            bracket.record_result(&match_id, &result.outcome.winner, score)?;
            results.push(result);
        }
        Ok(results)
    }
}
