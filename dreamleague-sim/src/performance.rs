//! Team performance rating from roster attributes and synergy.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    SYNERGY_MULTIPLIER_BASE, SYNERGY_MULTIPLIER_SPAN, WEIGHT_ADAPTABILITY, WEIGHT_CONSISTENCY,
    WEIGHT_FORM, WEIGHT_GAME_KNOWLEDGE, WEIGHT_MECHANICAL, WEIGHT_TEAM_COMMUNICATION,
};
use crate::error::SimulationError;
use crate::numbers::usize_to_f64;
use crate::roster::{Player, Team};

const DEFAULT_JITTER: (f64, f64) = (0.9, 1.1);

/// Averaged, synergy-adjusted attributes for one side of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub mechanical: f64,
    pub game_knowledge: f64,
    pub team_communication: f64,
    pub adaptability: f64,
    pub consistency: f64,
    /// Averaged form; synergy does not scale it.
    pub form: f64,
    pub synergy: f64,
    /// Weighted rating after jitter.
    pub overall: f64,
}

impl TeamPerformance {
    /// Weighted rating of the stored attributes, before any jitter.
    #[must_use]
    pub fn weighted(&self) -> f64 {
        self.mechanical * WEIGHT_MECHANICAL
            + self.game_knowledge * WEIGHT_GAME_KNOWLEDGE
            + self.team_communication * WEIGHT_TEAM_COMMUNICATION
            + self.adaptability * WEIGHT_ADAPTABILITY
            + self.consistency * WEIGHT_CONSISTENCY
            + self.form * WEIGHT_FORM
    }
}

/// Synergy multiplier in `[0.8, 1.2]` for synergy scores in `[0, 100]`.
#[must_use]
pub fn synergy_multiplier(synergy_score: f64) -> f64 {
    SYNERGY_MULTIPLIER_BASE + (synergy_score / 100.0) * SYNERGY_MULTIPLIER_SPAN
}

/// Rate a team using the default `[0.9, 1.1)` jitter.
///
/// # Errors
///
/// Returns [`SimulationError::EmptyRoster`] when `roster` has no players.
pub fn calculate_team_performance<R>(
    team: &Team,
    roster: &[Player],
    rng: &mut R,
) -> Result<TeamPerformance, SimulationError>
where
    R: Rng + ?Sized,
{
    calculate_team_performance_with_jitter(team, roster, DEFAULT_JITTER, rng)
}

/// Rate a team, scaling `overall` by a uniform factor drawn from `jitter`.
///
/// # Errors
///
/// Returns [`SimulationError::EmptyRoster`] when `roster` has no players.
pub fn calculate_team_performance_with_jitter<R>(
    team: &Team,
    roster: &[Player],
    jitter: (f64, f64),
    rng: &mut R,
) -> Result<TeamPerformance, SimulationError>
where
    R: Rng + ?Sized,
{
    if roster.is_empty() {
        return Err(SimulationError::EmptyRoster {
            team: team.id.clone(),
        });
    }

    let count = usize_to_f64(roster.len());
    let mut sums = [0.0_f64; 6];
    for player in roster {
        let attrs = &player.attributes;
        sums[0] += attrs.mechanical;
        sums[1] += attrs.game_knowledge;
        sums[2] += attrs.team_communication;
        sums[3] += attrs.adaptability_or_default();
        sums[4] += attrs.consistency;
        sums[5] += attrs.form_or_default();
    }
    let [mech, knowledge, comms, adapt, consistency, form] = sums.map(|sum| sum / count);

    let multiplier = synergy_multiplier(team.synergy_score);
    let mut performance = TeamPerformance {
        mechanical: mech * multiplier,
        game_knowledge: knowledge * multiplier,
        team_communication: comms * multiplier,
        adaptability: adapt * multiplier,
        consistency: consistency * multiplier,
        form,
        synergy: team.synergy_score,
        overall: 0.0,
    };

    let (low, high) = jitter;
    let factor = if high > low {
        rng.gen_range(low..high)
    } else {
        low
    };
    performance.overall = performance.weighted() * factor;

    debug!(
        "team {} rated {:.2} (synergy x{multiplier:.3}, jitter x{factor:.3})",
        team.id, performance.overall
    );
    Ok(performance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{PlayerAttributes, Position};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn roster_of(values: &[f64]) -> Vec<Player> {
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                Player::new(
                    format!("p{idx}"),
                    format!("Player {idx}"),
                    Position::Other,
                    PlayerAttributes::uniform(*value),
                )
            })
            .collect()
    }

    #[test]
    fn empty_roster_is_rejected() {
        let team = Team::new("t", "Nobody", 50.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let err = calculate_team_performance(&team, &[], &mut rng).unwrap_err();
        assert_eq!(
            err,
            SimulationError::EmptyRoster {
                team: team.id.clone()
            }
        );
    }

    #[test]
    fn synergy_scales_skills_but_not_form() {
        let team = Team::new("t", "Perfect", 100.0);
        let roster = roster_of(&[60.0, 80.0]);
        let mut rng = SmallRng::seed_from_u64(3);
        let perf = calculate_team_performance(&team, &roster, &mut rng).unwrap();
        assert!((perf.mechanical - 84.0).abs() < 1e-9);
        assert!((perf.form - 70.0).abs() < 1e-9);
        assert!((perf.synergy - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overall_stays_within_jitter_band() {
        let team = Team::new("t", "Mid", 50.0);
        let roster = roster_of(&[70.0; 5]);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let perf = calculate_team_performance(&team, &roster, &mut rng).unwrap();
            let weighted = perf.weighted();
            assert!(perf.overall >= weighted * 0.9 - 1e-9);
            assert!(perf.overall < weighted * 1.1 + 1e-9);
        }
    }

    #[test]
    fn degenerate_jitter_is_deterministic() {
        let team = Team::new("t", "Fixed", 50.0);
        let roster = roster_of(&[70.0]);
        let mut rng = SmallRng::seed_from_u64(5);
        let perf =
            calculate_team_performance_with_jitter(&team, &roster, (1.0, 1.0), &mut rng).unwrap();
        assert!((perf.overall - perf.weighted()).abs() < 1e-9);
    }

    #[test]
    fn synergy_multiplier_spans_expected_band() {
        assert!((synergy_multiplier(0.0) - 0.8).abs() < 1e-12);
        assert!((synergy_multiplier(50.0) - 1.0).abs() < 1e-12);
        assert!((synergy_multiplier(100.0) - 1.2).abs() < 1e-12);
    }
}
