//! Team tallies, per-player box scores, and MVP selection.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{
    DAMAGE_DEALT_BASE, DAMAGE_DEALT_NOISE, DAMAGE_DEALT_PER_POINT, DAMAGE_TAKEN_BASE,
    DAMAGE_TAKEN_NOISE, DAMAGE_TAKEN_PER_MISSING_POINT, DEFAULT_DURATION_MINUTES,
    DURATION_PADDING_MINUTES, GOLD_EARNED_BASE, GOLD_EARNED_NOISE, GOLD_EARNED_PER_POINT,
    GOLD_SPENT_BASE, GOLD_SPENT_NOISE, GOLD_SPENT_PER_POINT, MIN_DEATHS, PERFORMANCE_BASE_SCALE,
    PERFORMANCE_CEILING, PERFORMANCE_NOISE_MAX, VISION_BASE, VISION_NOISE, VISION_PER_POINT,
};
use crate::events::{EventKind, GamePhase, SimulationEvent};
use crate::numbers::floor_f64_to_u32;
use crate::roster::{Player, PlayerId, PlayerRef, Position, Team, TeamSide};

/// Box score for one player in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    /// 0..=10
    pub performance_score: f64,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: u32,
    pub gold_spent: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub vision_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TeamMatchStats {
    pub objectives: u32,
    pub teamfights: u32,
    pub plays: u32,
    pub early_game_score: u32,
    pub mid_game_score: u32,
    pub late_game_score: u32,
    pub mvp: Option<PlayerRef>,
}

impl TeamMatchStats {
    fn record(&mut self, event: &SimulationEvent) {
        match event.kind {
            EventKind::Objective => self.objectives += 1,
            EventKind::Teamfight => self.teamfights += 1,
            EventKind::Play => self.plays += 1,
        }
        let impact = u32::from(event.impact);
        match event.phase {
            GamePhase::Early => self.early_game_score += impact,
            GamePhase::Mid => self.mid_game_score += impact,
            GamePhase::Late => self.late_game_score += impact,
        }
    }

    /// Objectives plus teamfights, the measure commentators use to call the match.
    #[must_use]
    pub const fn dominance(&self) -> u32 {
        self.objectives.saturating_add(self.teamfights)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TeamStatsPair {
    #[serde(rename = "teamA")]
    pub team_a: TeamMatchStats,
    #[serde(rename = "teamB")]
    pub team_b: TeamMatchStats,
}

impl TeamStatsPair {
    #[must_use]
    pub const fn side(&self, side: TeamSide) -> &TeamMatchStats {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    fn side_mut(&mut self, side: TeamSide) -> &mut TeamMatchStats {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Minutes.
    pub duration: u32,
    pub team_stats: TeamStatsPair,
    pub player_performances: BTreeMap<PlayerId, PlayerPerformance>,
}

impl MatchStats {
    #[must_use]
    pub fn performance(&self, player: &PlayerId) -> Option<&PlayerPerformance> {
        self.player_performances.get(player)
    }
}

/// Kill/death/assist shape for a role: `value = scale * score + U[0, noise)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PositionProfile {
    kill_scale: f64,
    kill_noise: f64,
    death_divisor: f64,
    death_noise: f64,
    assist_scale: f64,
    assist_noise: f64,
}

const CARRY_PROFILE: PositionProfile = PositionProfile {
    kill_scale: 2.0,
    kill_noise: 3.0,
    death_divisor: 2.0,
    death_noise: 2.0,
    assist_scale: 1.0,
    assist_noise: 5.0,
};

const JUNGLE_PROFILE: PositionProfile = PositionProfile {
    kill_scale: 1.0,
    kill_noise: 3.0,
    death_divisor: 2.0,
    death_noise: 2.0,
    assist_scale: 1.5,
    assist_noise: 3.0,
};

const SUPPORT_PROFILE: PositionProfile = PositionProfile {
    kill_scale: 0.5,
    kill_noise: 2.0,
    death_divisor: 1.5,
    death_noise: 2.0,
    assist_scale: 2.5,
    assist_noise: 4.0,
};

const DEFAULT_PROFILE: PositionProfile = PositionProfile {
    kill_scale: 1.0,
    kill_noise: 2.0,
    death_divisor: 2.0,
    death_noise: 2.0,
    assist_scale: 1.0,
    assist_noise: 3.0,
};

const fn profile_for(position: Position) -> &'static PositionProfile {
    match position {
        Position::Carry | Position::Mid => &CARRY_PROFILE,
        Position::Jungle => &JUNGLE_PROFILE,
        Position::Support => &SUPPORT_PROFILE,
        Position::Top | Position::Other => &DEFAULT_PROFILE,
    }
}

fn noise<R>(rng: &mut R, upper: f64) -> f64
where
    R: Rng + ?Sized,
{
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

/// Roll a box score for `player` from their weighted attributes and position.
pub fn generate_player_performance<R>(player: &Player, rng: &mut R) -> PlayerPerformance
where
    R: Rng + ?Sized,
{
    let base = player.attributes.normalized_rating();
    let score = (base * PERFORMANCE_BASE_SCALE + noise(rng, PERFORMANCE_NOISE_MAX))
        .clamp(0.0, PERFORMANCE_CEILING);
    let missing = PERFORMANCE_CEILING - score;
    let profile = profile_for(player.position);

    let kills = floor_f64_to_u32(score * profile.kill_scale + noise(rng, profile.kill_noise));
    let deaths = floor_f64_to_u32(missing / profile.death_divisor + noise(rng, profile.death_noise))
        .max(MIN_DEATHS);
    let assists = floor_f64_to_u32(score * profile.assist_scale + noise(rng, profile.assist_noise));

    PlayerPerformance {
        performance_score: score,
        kills,
        deaths,
        assists,
        gold_earned: floor_f64_to_u32(
            GOLD_EARNED_BASE + score * GOLD_EARNED_PER_POINT + noise(rng, GOLD_EARNED_NOISE),
        ),
        gold_spent: floor_f64_to_u32(
            GOLD_SPENT_BASE + score * GOLD_SPENT_PER_POINT + noise(rng, GOLD_SPENT_NOISE),
        ),
        damage_dealt: floor_f64_to_u32(
            DAMAGE_DEALT_BASE + score * DAMAGE_DEALT_PER_POINT + noise(rng, DAMAGE_DEALT_NOISE),
        ),
        damage_taken: floor_f64_to_u32(
            DAMAGE_TAKEN_BASE
                + missing * DAMAGE_TAKEN_PER_MISSING_POINT
                + noise(rng, DAMAGE_TAKEN_NOISE),
        ),
        vision_score: floor_f64_to_u32(
            VISION_BASE + score * VISION_PER_POINT + noise(rng, VISION_NOISE),
        ),
    }
}

/// Store a box score, returning `true` when it replaced one already recorded for the same id.
fn insert_performance(
    performances: &mut BTreeMap<PlayerId, PlayerPerformance>,
    player: &Player,
    performance: PlayerPerformance,
) -> bool {
    let replaced = performances
        .insert(player.id.clone(), performance)
        .is_some();
    if replaced {
        debug!(
            "player {} appears more than once across both rosters; keeping the later box score",
            player.id
        );
    }
    replaced
}

/// Highest-scoring player of `roster`; the earliest roster entry wins ties.
///
/// Players without a box score are skipped.
#[must_use]
pub fn select_mvp(
    roster: &[Player],
    performances: &BTreeMap<PlayerId, PlayerPerformance>,
) -> Option<PlayerRef> {
    let mut best: Option<(&Player, f64)> = None;
    for player in roster {
        let Some(perf) = performances.get(&player.id) else {
            debug!("no performance recorded for {}; skipped for MVP", player.id);
            continue;
        };
        match best {
            Some((_, top)) if perf.performance_score <= top => {}
            _ => best = Some((player, perf.performance_score)),
        }
    }
    best.map(|(player, _)| player.to_ref())
}

/// Match duration in minutes: last event plus padding, or the default when nothing happened.
#[must_use]
pub fn match_duration(events: &[SimulationEvent]) -> u32 {
    events
        .iter()
        .map(|event| event.time)
        .max()
        .map_or(DEFAULT_DURATION_MINUTES, |last| {
            last.saturating_add(DURATION_PADDING_MINUTES)
        })
}

/// Summarize a match log into team tallies, box scores, and MVPs.
pub fn analyze_match_stats<R>(
    events: &[SimulationEvent],
    team_a: &Team,
    team_b: &Team,
    roster_a: &[Player],
    roster_b: &[Player],
    rng: &mut R,
) -> MatchStats
where
    R: Rng + ?Sized,
{
    let mut team_stats = TeamStatsPair::default();
    for event in events {
        team_stats.side_mut(event.favored_team).record(event);
    }

    let mut player_performances = BTreeMap::new();
    for player in roster_a.iter().chain(roster_b) {
        let performance = generate_player_performance(player, rng);
        insert_performance(&mut player_performances, player, performance);
    }

    team_stats.team_a.mvp = select_mvp(roster_a, &player_performances);
    team_stats.team_b.mvp = select_mvp(roster_b, &player_performances);
    debug!(
        "stats for {} vs {}: {} box scores",
        team_a.id,
        team_b.id,
        player_performances.len()
    );

    MatchStats {
        duration: match_duration(events),
        team_stats,
        player_performances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::PlayerAttributes;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn event(
        time: u32,
        kind: EventKind,
        phase: GamePhase,
        side: TeamSide,
        impact: u8,
    ) -> SimulationEvent {
        SimulationEvent {
            time,
            kind,
            phase,
            description: String::from("test"),
            favored_team: side,
            impact,
        }
    }

    fn player(id: &str, position: Position, rating: f64) -> Player {
        Player::new(id, id.to_uppercase(), position, PlayerAttributes::uniform(rating))
    }

    fn perf_with_score(score: f64) -> PlayerPerformance {
        PlayerPerformance {
            performance_score: score,
            kills: 0,
            deaths: 1,
            assists: 0,
            gold_earned: 0,
            gold_spent: 0,
            damage_dealt: 0,
            damage_taken: 0,
            vision_score: 0,
        }
    }

    #[test]
    fn duration_defaults_without_events() {
        assert_eq!(match_duration(&[]), 30);
        let events = [
            event(3, EventKind::Play, GamePhase::Early, TeamSide::A, 1),
            event(29, EventKind::Play, GamePhase::Late, TeamSide::B, 1),
        ];
        assert_eq!(match_duration(&events), 34);
    }

    #[test]
    fn tallies_events_by_side_kind_and_phase() {
        let events = [
            event(1, EventKind::Objective, GamePhase::Early, TeamSide::A, 2),
            event(16, EventKind::Teamfight, GamePhase::Mid, TeamSide::A, 3),
            event(20, EventKind::Play, GamePhase::Mid, TeamSide::B, 1),
            event(27, EventKind::Objective, GamePhase::Late, TeamSide::B, 3),
        ];
        let team_a = Team::new("a", "Alpha", 50.0);
        let team_b = Team::new("b", "Bravo", 50.0);
        let roster_a = vec![player("a1", Position::Mid, 70.0)];
        let roster_b = vec![player("b1", Position::Support, 70.0)];
        let mut rng = SmallRng::seed_from_u64(4);
        let stats =
            analyze_match_stats(&events, &team_a, &team_b, &roster_a, &roster_b, &mut rng);

        let a = stats.team_stats.side(TeamSide::A);
        assert_eq!((a.objectives, a.teamfights, a.plays), (1, 1, 0));
        assert_eq!(
            (a.early_game_score, a.mid_game_score, a.late_game_score),
            (2, 3, 0)
        );
        let b = stats.team_stats.side(TeamSide::B);
        assert_eq!((b.objectives, b.plays, b.late_game_score), (1, 1, 3));
        assert_eq!(stats.duration, 32);
        assert_eq!(stats.player_performances.len(), 2);
        assert_eq!(a.mvp.as_ref().map(|m| m.id.as_str()), Some("a1"));
    }

    #[test]
    fn box_scores_respect_floors() {
        let mut rng = SmallRng::seed_from_u64(99);
        for position in [
            Position::Carry,
            Position::Jungle,
            Position::Support,
            Position::Top,
            Position::Other,
        ] {
            for rating in [0.0, 50.0, 100.0] {
                let perf = generate_player_performance(&player("p", position, rating), &mut rng);
                assert!(perf.deaths >= 1);
                assert!((0.0..=10.0).contains(&perf.performance_score));
                assert!(perf.gold_earned >= 5_000);
                assert!(perf.damage_taken >= 8_000);
            }
        }
    }

    #[test]
    fn stronger_carries_outscore_weaker_supports_on_average() {
        let mut rng = SmallRng::seed_from_u64(5);
        let carry = player("c", Position::Carry, 90.0);
        let support = player("s", Position::Support, 90.0);
        let (mut carry_kills, mut support_assists, mut support_kills) = (0_u64, 0_u64, 0_u64);
        for _ in 0..500 {
            carry_kills += u64::from(generate_player_performance(&carry, &mut rng).kills);
            let perf = generate_player_performance(&support, &mut rng);
            support_kills += u64::from(perf.kills);
            support_assists += u64::from(perf.assists);
        }
        assert!(carry_kills > support_kills * 2);
        assert!(support_assists > support_kills * 3);
    }

    #[test]
    fn mvp_prefers_first_on_ties_and_skips_missing() {
        let roster = vec![
            player("x", Position::Top, 60.0),
            player("y", Position::Mid, 60.0),
            player("z", Position::Jungle, 60.0),
        ];
        let mut perfs = BTreeMap::new();
        perfs.insert(PlayerId::new("y"), perf_with_score(7.5));
        perfs.insert(PlayerId::new("z"), perf_with_score(7.5));
        let mvp = select_mvp(&roster, &perfs).unwrap();
        assert_eq!(mvp.id.as_str(), "y");
        assert!(select_mvp(&[], &perfs).is_none());
        assert!(select_mvp(&roster, &BTreeMap::new()).is_none());
    }

    #[test]
    fn shared_player_ids_collapse_to_one_box_score() {
        let mut perfs = BTreeMap::new();
        let shared = player("dup", Position::Mid, 70.0);
        assert!(!insert_performance(&mut perfs, &shared, perf_with_score(4.0)));
        assert!(insert_performance(&mut perfs, &shared, perf_with_score(6.0)));
        assert_eq!(perfs.len(), 1);
        assert!((perfs[&PlayerId::new("dup")].performance_score - 6.0).abs() < f64::EPSILON);

        let team_a = Team::new("a", "Alpha", 50.0);
        let team_b = Team::new("b", "Bravo", 50.0);
        let roster = vec![shared, player("solo", Position::Support, 60.0)];
        let mut rng = SmallRng::seed_from_u64(9);
        let stats = analyze_match_stats(&[], &team_a, &team_b, &roster, &roster, &mut rng);
        assert_eq!(stats.player_performances.len(), 2);
        assert!(stats.team_stats.side(TeamSide::A).mvp.is_some());
        assert!(stats.team_stats.side(TeamSide::B).mvp.is_some());
    }
}
