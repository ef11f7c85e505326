//! Single-elimination tournament brackets.
//!
//! Seeds are paired outside-in (first vs last); an odd team out gets a bye into the next
//! round. A round advances as soon as its last match is recorded.
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::TeamId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TournamentError {
    #[error("a bracket needs at least 2 teams (got {count})")]
    NotEnoughTeams { count: usize },
    #[error("team {team} is already registered")]
    DuplicateTeam { team: TeamId },
    #[error("registration is closed")]
    RegistrationClosed,
    #[error("match {match_id} not found in the current round")]
    MatchNotFound { match_id: String },
    #[error("match {match_id} already has a result")]
    MatchAlreadyRecorded { match_id: String },
    #[error("team {team} did not play in match {match_id}")]
    InvalidWinner { match_id: String, team: TeamId },
    #[error("the bracket has already been decided")]
    BracketCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BracketStatus {
    #[default]
    Registration,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    /// `R{round}_M{n}`
    pub match_id: String,
    pub round: u32,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub winner: Option<TeamId>,
    pub score: [u8; 2],
    pub completed: bool,
}

impl BracketMatch {
    fn involves(&self, team: &TeamId) -> bool {
        &self.team_a == team || &self.team_b == team
    }

    /// The team that did not win, once a result exists.
    #[must_use]
    pub fn loser(&self) -> Option<&TeamId> {
        let winner = self.winner.as_ref()?;
        Some(if winner == &self.team_a {
            &self.team_b
        } else {
            &self.team_a
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Bracket {
    status: BracketStatus,
    teams: Vec<TeamId>,
    matches: Vec<BracketMatch>,
    round: u32,
    /// Teams advancing from the current round without playing.
    byes: Vec<TeamId>,
    champion: Option<TeamId>,
}

impl Bracket {
    /// Open an empty bracket for registration.
    #[must_use]
    pub fn registration() -> Self {
        Self::default()
    }

    /// Register `teams` in seed order and start round 1.
    ///
    /// # Errors
    ///
    /// Returns [`TournamentError::NotEnoughTeams`] for fewer than two teams and
    /// [`TournamentError::DuplicateTeam`] when a team appears twice.
    pub fn new(teams: Vec<TeamId>) -> Result<Self, TournamentError> {
        let mut bracket = Self::registration();
        for team in teams {
            bracket.register_team(team)?;
        }
        bracket.start()?;
        Ok(bracket)
    }

    /// # Errors
    ///
    /// Fails once the bracket has started or when the team is already registered.
    pub fn register_team(&mut self, team: TeamId) -> Result<(), TournamentError> {
        if self.status != BracketStatus::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        if self.teams.contains(&team) {
            return Err(TournamentError::DuplicateTeam { team });
        }
        self.teams.push(team);
        Ok(())
    }

    /// Close registration and pair round 1.
    ///
    /// # Errors
    ///
    /// Fails when already started or with fewer than two registered teams.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.status != BracketStatus::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        if self.teams.len() < 2 {
            return Err(TournamentError::NotEnoughTeams {
                count: self.teams.len(),
            });
        }
        self.status = BracketStatus::InProgress;
        let seeds = self.teams.clone();
        self.pair_round(1, &seeds);
        Ok(())
    }

    #[must_use]
    pub const fn status(&self) -> BracketStatus {
        self.status
    }

    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    /// Every match ever paired, in creation order.
    #[must_use]
    pub fn matches(&self) -> &[BracketMatch] {
        &self.matches
    }

    #[must_use]
    pub fn byes(&self) -> &[TeamId] {
        &self.byes
    }

    #[must_use]
    pub const fn champion(&self) -> Option<&TeamId> {
        self.champion.as_ref()
    }

    /// Unplayed matches of the current round.
    #[must_use]
    pub fn pending_matches(&self) -> Vec<&BracketMatch> {
        self.matches
            .iter()
            .filter(|m| m.round == self.round && !m.completed)
            .collect()
    }

    /// Record a result; completing a round pairs the next one.
    ///
    /// # Errors
    ///
    /// Returns a [`TournamentError`] when the bracket is decided, the match is unknown or already
    /// played, or `winner` did not take part.
    pub fn record_result(
        &mut self,
        match_id: &str,
        winner: &TeamId,
        score: [u8; 2],
    ) -> Result<(), TournamentError> {
        if self.status == BracketStatus::Completed {
            return Err(TournamentError::BracketCompleted);
        }
        let round = self.round;
        let slot = self
            .matches
            .iter_mut()
            .find(|m| m.match_id == match_id && m.round == round)
            .ok_or_else(|| TournamentError::MatchNotFound {
                match_id: match_id.to_string(),
            })?;
        if slot.completed {
            return Err(TournamentError::MatchAlreadyRecorded {
                match_id: match_id.to_string(),
            });
        }
        if !slot.involves(winner) {
            return Err(TournamentError::InvalidWinner {
                match_id: match_id.to_string(),
                team: winner.clone(),
            });
        }
        slot.winner = Some(winner.clone());
        slot.score = score;
        slot.completed = true;
        info!(
            "{match_id}: {winner} wins {}-{}",
            score[0].max(score[1]),
            score[0].min(score[1])
        );

        if self.pending_matches().is_empty() {
            self.advance();
        }
        Ok(())
    }

    fn advance(&mut self) {
        let mut advancing: Vec<TeamId> = self
            .matches
            .iter()
            .filter(|m| m.round == self.round)
            .filter_map(|m| m.winner.clone())
            .collect();
        advancing.append(&mut self.byes);

        if let [champion] = advancing.as_slice() {
            info!("bracket decided after round {}: {champion}", self.round);
            self.champion = Some(champion.clone());
            self.status = BracketStatus::Completed;
            return;
        }
        info!(
            "round {} complete; {} teams advance",
            self.round,
            advancing.len()
        );
        self.pair_round(self.round + 1, &advancing);
    }

    fn pair_round(&mut self, round: u32, seeds: &[TeamId]) {
        self.round = round;
        let count = seeds.len();
        for idx in 0..count / 2 {
            self.matches.push(BracketMatch {
                match_id: format!("R{round}_M{}", idx + 1),
                round,
                team_a: seeds[idx].clone(),
                team_b: seeds[count - 1 - idx].clone(),
                winner: None,
                score: [0, 0],
                completed: false,
            });
        }
        if count % 2 == 1 {
            self.byes.push(seeds[count / 2].clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(n: usize) -> Vec<TeamId> {
        (1..=n).map(|i| TeamId::new(format!("t{i}"))).collect()
    }

    #[test]
    fn needs_two_teams() {
        assert_eq!(
            Bracket::new(teams(1)),
            Err(TournamentError::NotEnoughTeams { count: 1 })
        );
    }

    #[test]
    fn pairs_outside_in() {
        let bracket = Bracket::new(teams(4)).unwrap();
        let pending = bracket.pending_matches();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].match_id, "R1_M1");
        assert_eq!(pending[0].team_a.as_str(), "t1");
        assert_eq!(pending[0].team_b.as_str(), "t4");
        assert_eq!(pending[1].team_a.as_str(), "t2");
        assert_eq!(pending[1].team_b.as_str(), "t3");
        assert_eq!(bracket.status(), BracketStatus::InProgress);
    }

    #[test]
    fn validates_results() {
        let mut bracket = Bracket::new(teams(2)).unwrap();
        assert!(matches!(
            bracket.record_result("R9_M9", &TeamId::new("t1"), [2, 1]),
            Err(TournamentError::MatchNotFound { .. })
        ));
        assert!(matches!(
            bracket.record_result("R1_M1", &TeamId::new("t7"), [2, 1]),
            Err(TournamentError::InvalidWinner { .. })
        ));
        bracket
            .record_result("R1_M1", &TeamId::new("t2"), [1, 3])
            .unwrap();
        assert_eq!(bracket.status(), BracketStatus::Completed);
        assert_eq!(bracket.champion().map(TeamId::as_str), Some("t2"));
        assert_eq!(
            bracket.record_result("R1_M1", &TeamId::new("t2"), [1, 3]),
            Err(TournamentError::BracketCompleted)
        );
        assert_eq!(
            bracket.matches()[0].loser().map(TeamId::as_str),
            Some("t1")
        );
    }

    #[test]
    fn rejects_double_recording() {
        let mut bracket = Bracket::new(teams(4)).unwrap();
        bracket
            .record_result("R1_M1", &TeamId::new("t1"), [3, 1])
            .unwrap();
        assert!(matches!(
            bracket.record_result("R1_M1", &TeamId::new("t1"), [3, 1]),
            Err(TournamentError::MatchAlreadyRecorded { .. })
        ));
    }

    #[test]
    fn odd_team_gets_bye_into_next_round() {
        let mut bracket = Bracket::new(teams(3)).unwrap();
        assert_eq!(bracket.pending_matches().len(), 1);
        assert_eq!(bracket.byes(), &[TeamId::new("t2")]);
        bracket
            .record_result("R1_M1", &TeamId::new("t3"), [1, 2])
            .unwrap();
        assert_eq!(bracket.current_round(), 2);
        let final_match = bracket.pending_matches()[0].clone();
        assert_eq!(final_match.match_id, "R2_M1");
        assert_eq!(final_match.team_a.as_str(), "t3");
        assert_eq!(final_match.team_b.as_str(), "t2");
        assert!(bracket.byes().is_empty());
    }

    #[test]
    fn eight_teams_finish_in_three_rounds() {
        let mut bracket = Bracket::new(teams(8)).unwrap();
        while bracket.status() != BracketStatus::Completed {
            let pending: Vec<(String, TeamId)> = bracket
                .pending_matches()
                .iter()
                .map(|m| (m.match_id.clone(), m.team_a.clone()))
                .collect();
            for (match_id, team_a) in pending {
                bracket.record_result(&match_id, &team_a, [2, 0]).unwrap();
            }
        }
        assert_eq!(bracket.current_round(), 3);
        assert_eq!(bracket.matches().len(), 7);
        assert_eq!(bracket.champion().map(TeamId::as_str), Some("t1"));
    }

    #[test]
    fn registration_rules() {
        let mut bracket = Bracket::registration();
        bracket.register_team(TeamId::new("a")).unwrap();
        assert_eq!(
            bracket.register_team(TeamId::new("a")),
            Err(TournamentError::DuplicateTeam {
                team: TeamId::new("a")
            })
        );
        assert_eq!(
            bracket.start(),
            Err(TournamentError::NotEnoughTeams { count: 1 })
        );
        bracket.register_team(TeamId::new("b")).unwrap();
        bracket.start().unwrap();
        assert_eq!(
            bracket.register_team(TeamId::new("c")),
            Err(TournamentError::RegistrationClosed)
        );
    }
}
