//! Payload handed to the external match-result recorder.
use serde::{Deserialize, Serialize};

use crate::engine::MatchResult;
use crate::numbers::saturate_u32_to_u8;
use crate::roster::TeamId;

/// How `MatchRecord::match_stats` is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatsEncoding {
    /// Two bytes, `[score_a, score_b]`.
    #[default]
    ScorePair,
    /// The full `MatchStats` as JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub winner_id: TeamId,
    pub loser_id: TeamId,
    pub score: [u8; 2],
    pub match_stats: Vec<u8>,
}

impl MatchRecord {
    /// Build the recorder payload for a finished match.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding of the stats fails.
    pub fn from_result(
        match_id: impl Into<String>,
        result: &MatchResult,
        encoding: StatsEncoding,
    ) -> Result<Self, serde_json::Error> {
        let outcome = &result.outcome;
        let score = outcome.score.map(saturate_u32_to_u8);
        let match_stats = match encoding {
            StatsEncoding::ScorePair => score.to_vec(),
            StatsEncoding::Json => serde_json::to_vec(&outcome.stats)?,
        };
        Ok(Self {
            match_id: match_id.into(),
            winner_id: outcome.winner.clone(),
            loser_id: outcome.loser.clone(),
            score,
            match_stats,
        })
    }
}

/// External sink for finished matches (ledger, database, ...).
pub trait ResultRecorder {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an implementation-defined error when the record cannot be stored.
    fn record_match(&self, record: &MatchRecord) -> Result<(), Self::Error>;
}
