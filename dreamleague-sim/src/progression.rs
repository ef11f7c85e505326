//! Post-match experience, attribute drift, and form swings.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ATTRIBUTE_SCALE, EXP_BASE_LOSS, EXP_BASE_WIN, EXP_KILL_CONTRIBUTION, EXP_MVP_BONUS,
    FORM_CHANGE_LOSS_MAX, FORM_CHANGE_LOSS_MIN, FORM_CHANGE_WIN_MAX, FORM_CHANGE_WIN_MIN,
    FORM_FLOOR, SKILL_FLOOR, STAT_CHANGE_LOSS, STAT_CHANGE_MAX, STAT_CHANGE_MIN,
    STAT_CHANGE_NOISE, STAT_CHANGE_WIN,
};
use crate::engine::MatchOutcome;
use crate::numbers::{round_f64_to_i32, round_f64_to_u32};
use crate::rng::MatchRng;
use crate::roster::{Player, PlayerAttributes, PlayerId, TeamSide};
use crate::stats::PlayerPerformance;

/// Changes earned by one player from one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub player_id: PlayerId,
    pub exp_gained: u32,
    pub mechanical_change: i8,
    pub game_knowledge_change: i8,
    pub team_communication_change: i8,
    pub adaptability_change: i8,
    pub consistency_change: i8,
    pub form_change: i8,
    pub is_mvp: bool,
}

fn to_delta(value: i32) -> i8 {
    i8::try_from(value).unwrap_or(if value < 0 { i8::MIN } else { i8::MAX })
}

fn skill_delta<R>(won: bool, base: f64, rng: &mut R) -> i8
where
    R: Rng + ?Sized,
{
    let outcome = if won { STAT_CHANGE_WIN } else { STAT_CHANGE_LOSS };
    let modifier = (base / ATTRIBUTE_SCALE) * 2.0 - 1.0;
    let noise = f64::from(rng.gen_range(-STAT_CHANGE_NOISE..=STAT_CHANGE_NOISE));
    let delta = round_f64_to_i32(outcome + modifier + noise);
    to_delta(delta.clamp(STAT_CHANGE_MIN, STAT_CHANGE_MAX))
}

/// Roll progression for one player.
///
/// `performance` supplies the kill count for the contribution bonus; without it kills count as 0.
pub fn compute_progress<R>(
    player: &Player,
    won: bool,
    is_mvp: bool,
    performance: Option<&PlayerPerformance>,
    rng: &mut R,
) -> PlayerProgress
where
    R: Rng + ?Sized,
{
    let base = player.attributes.weighted_rating();
    let kills = performance.map_or(0.0, |perf| f64::from(perf.kills));
    let contribution = (base / ATTRIBUTE_SCALE) * (1.0 + kills * EXP_KILL_CONTRIBUTION);
    let base_exp = if won { EXP_BASE_WIN } else { EXP_BASE_LOSS };
    let mvp_factor = if is_mvp { 1.0 + EXP_MVP_BONUS } else { 1.0 };
    let exp_gained = round_f64_to_u32(base_exp * (1.0 + contribution) * mvp_factor);

    let mechanical_change = skill_delta(won, base, rng);
    let game_knowledge_change = skill_delta(won, base, rng);
    let team_communication_change = skill_delta(won, base, rng);
    let adaptability_change = skill_delta(won, base, rng);
    let consistency_change = skill_delta(won, base, rng);
    let form_change = to_delta(if won {
        rng.gen_range(FORM_CHANGE_WIN_MIN..=FORM_CHANGE_WIN_MAX)
    } else {
        rng.gen_range(FORM_CHANGE_LOSS_MIN..=FORM_CHANGE_LOSS_MAX)
    });

    PlayerProgress {
        player_id: player.id.clone(),
        exp_gained,
        mechanical_change,
        game_knowledge_change,
        team_communication_change,
        adaptability_change,
        consistency_change,
        form_change,
        is_mvp,
    }
}

fn bump(stat: f64, change: i8, floor: f64) -> f64 {
    (stat + f64::from(change)).clamp(floor, ATTRIBUTE_SCALE)
}

/// Apply `progress` to `attributes`: skills stay in `[1, 100]`, form in `[0, 100]`.
pub fn apply_progress(attributes: &mut PlayerAttributes, progress: &PlayerProgress) {
    attributes.mechanical = bump(attributes.mechanical, progress.mechanical_change, SKILL_FLOOR);
    attributes.game_knowledge = bump(
        attributes.game_knowledge,
        progress.game_knowledge_change,
        SKILL_FLOOR,
    );
    attributes.team_communication = bump(
        attributes.team_communication,
        progress.team_communication_change,
        SKILL_FLOOR,
    );
    attributes.adaptability = Some(bump(
        attributes.adaptability_or_default(),
        progress.adaptability_change,
        SKILL_FLOOR,
    ));
    attributes.consistency = bump(attributes.consistency, progress.consistency_change, SKILL_FLOOR);
    attributes.form = Some(bump(
        attributes.form_or_default(),
        progress.form_change,
        FORM_FLOOR,
    ));
}

/// Progression for every player of a finished match, team A first.
///
/// The match MVP is the winning side's MVP.
pub fn progress_for_match_with<R>(
    outcome: &MatchOutcome,
    roster_a: &[Player],
    roster_b: &[Player],
    rng: &mut R,
) -> Vec<PlayerProgress>
where
    R: Rng + ?Sized,
{
    let match_mvp = outcome
        .stats
        .team_stats
        .side(outcome.winner_side)
        .mvp
        .as_ref()
        .map(|mvp| &mvp.id);
    let sides = [(TeamSide::A, roster_a), (TeamSide::B, roster_b)];
    let mut progress = Vec::with_capacity(roster_a.len() + roster_b.len());
    for (side, roster) in sides {
        let won = side == outcome.winner_side;
        for player in roster {
            let is_mvp = match_mvp == Some(&player.id);
            let performance = outcome.stats.performance(&player.id);
            progress.push(compute_progress(player, won, is_mvp, performance, rng));
        }
    }
    progress
}

/// Progression drawn from the match seed's dedicated progression stream.
#[must_use]
pub fn progress_for_match(
    outcome: &MatchOutcome,
    roster_a: &[Player],
    roster_b: &[Player],
    seed: u64,
) -> Vec<PlayerProgress> {
    let mut streams = MatchRng::from_user_seed(seed);
    progress_for_match_with(outcome, roster_a, roster_b, streams.progression())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Position;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn player(rating: f64) -> Player {
        Player::new("p", "Pro", Position::Mid, PlayerAttributes::uniform(rating))
    }

    fn progress(changes: i8, form_change: i8) -> PlayerProgress {
        PlayerProgress {
            player_id: PlayerId::new("p"),
            exp_gained: 0,
            mechanical_change: changes,
            game_knowledge_change: changes,
            team_communication_change: changes,
            adaptability_change: changes,
            consistency_change: changes,
            form_change,
            is_mvp: false,
        }
    }

    #[test]
    fn exp_scales_with_result_kills_and_mvp() {
        let pro = player(80.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let loss = compute_progress(&pro, false, false, None, &mut rng);
        assert_eq!(loss.exp_gained, 90);
        let win = compute_progress(&pro, true, false, None, &mut rng);
        assert_eq!(win.exp_gained, 180);
        let mvp = compute_progress(&pro, true, true, None, &mut rng);
        assert_eq!(mvp.exp_gained, 225);
    }

    #[test]
    fn kills_raise_contribution() {
        let pro = player(80.0);
        let perf = PlayerPerformance {
            performance_score: 8.0,
            kills: 10,
            deaths: 2,
            assists: 5,
            gold_earned: 9_000,
            gold_spent: 8_000,
            damage_dealt: 30_000,
            damage_taken: 10_000,
            vision_score: 30,
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let with_kills = compute_progress(&pro, true, false, Some(&perf), &mut rng);
        assert_eq!(with_kills.exp_gained, 220);
    }

    #[test]
    fn deltas_stay_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        for rating in [0.0, 50.0, 100.0] {
            for won in [true, false] {
                for _ in 0..200 {
                    let p = compute_progress(&player(rating), won, false, None, &mut rng);
                    for delta in [
                        p.mechanical_change,
                        p.game_knowledge_change,
                        p.team_communication_change,
                        p.adaptability_change,
                        p.consistency_change,
                    ] {
                        assert!((-3..=5).contains(&delta));
                    }
                    if won {
                        assert!((3..=10).contains(&p.form_change));
                    } else {
                        assert!((-7..=2).contains(&p.form_change));
                    }
                }
            }
        }
    }

    #[test]
    fn apply_clamps_skills_and_form() {
        let mut attrs = PlayerAttributes::uniform(99.0);
        apply_progress(&mut attrs, &progress(5, 10));
        assert!((attrs.mechanical - 100.0).abs() < f64::EPSILON);
        assert_eq!(attrs.form, Some(100.0));

        let mut low = PlayerAttributes::uniform(2.0);
        apply_progress(&mut low, &progress(-3, -7));
        assert!((low.consistency - 1.0).abs() < f64::EPSILON);
        assert_eq!(low.form, Some(0.0));
    }

    #[test]
    fn apply_fills_missing_optional_attributes() {
        let mut attrs = PlayerAttributes {
            adaptability: None,
            form: None,
            ..PlayerAttributes::uniform(60.0)
        };
        apply_progress(&mut attrs, &progress(2, -4));
        assert_eq!(attrs.adaptability, Some(52.0));
        assert_eq!(attrs.form, Some(46.0));
    }
}
