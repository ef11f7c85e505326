//! Errors raised by the match simulation pipeline.
use thiserror::Error;

use crate::roster::{TeamId, TeamSide};

/// Failures that abort a simulation before any result is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("team {team} has no players to rate")]
    EmptyRoster { team: TeamId },
    #[error("{side} ({team}) does not field a roster")]
    InsufficientRoster { side: TeamSide, team: TeamId },
}
