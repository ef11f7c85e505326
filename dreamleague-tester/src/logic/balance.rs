use anyhow::{Result, ensure};
use dreamleague_sim::{MatchKind, TeamSide};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::logic::match_tester::{FixtureKind, MatchPlan, MatchSummary, MatchTester};
use crate::logic::seeds::SeedInfo;

/// One simulated match of the balance sweep.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceRecord {
    pub fixture: FixtureKind,
    pub seed_code: String,
    pub seed_value: u64,
    pub winner_side: TeamSide,
    pub score: [u32; 2],
    pub duration: u32,
    pub mvp_on_winning_side: bool,
    pub replay_matches: bool,
}

impl BalanceRecord {
    fn from_summary(summary: &MatchSummary) -> Self {
        let outcome = &summary.result.outcome;
        let winner_stats = outcome.stats.team_stats.side(outcome.winner_side);
        let winner_roster = match outcome.winner_side {
            TeamSide::A => &summary.fixture.roster_a,
            TeamSide::B => &summary.fixture.roster_b,
        };
        let mvp_on_winning_side = winner_stats
            .mvp
            .as_ref()
            .is_some_and(|mvp| winner_roster.iter().any(|p| p.id == mvp.id));
        Self {
            fixture: summary.fixture.kind,
            seed_code: summary.share_code.clone(),
            seed_value: summary.seed,
            winner_side: outcome.winner_side,
            score: outcome.score,
            duration: outcome.stats.duration,
            mvp_on_winning_side,
            replay_matches: summary.replay_matches(),
        }
    }

    /// Winner score minus loser score.
    #[must_use]
    pub fn margin(&self) -> u32 {
        self.score[0].abs_diff(self.score[1])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceAggregate {
    pub fixture: FixtureKind,
    pub iterations: usize,
    pub team_a_win_rate: f64,
    pub mean_margin: f64,
    pub std_margin: f64,
    pub mean_duration: f64,
    pub level_score_rate: f64,
    pub replay_failures: usize,
}

/// Play every fixture for every seed, `iterations` consecutive seeds each.
///
/// # Errors
///
/// Fails when a fixture cannot be simulated.
pub fn run_balance_analysis(
    tester: &MatchTester,
    seeds: &[SeedInfo],
    iterations: usize,
) -> Result<Vec<BalanceRecord>> {
    let mut records = Vec::with_capacity(FixtureKind::ALL.len() * seeds.len() * iterations);
    for fixture in FixtureKind::ALL {
        for info in seeds {
            let kind = info.source_kind.unwrap_or(MatchKind::Exhibition);
            let plan = MatchPlan::new(fixture).with_kind(kind);
            for i in 0..iterations {
                let seed = info
                    .seed
                    .wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
                let summary = tester.run_plan(&plan, seed)?;
                records.push(BalanceRecord::from_summary(&summary));
            }
        }
    }
    Ok(records)
}

#[must_use]
pub fn aggregate_balance(records: &[BalanceRecord]) -> Vec<BalanceAggregate> {
    let mut builders: BTreeMap<FixtureKind, AggregateBuilder> = BTreeMap::new();
    for record in records {
        builders
            .entry(record.fixture)
            .or_insert_with(|| AggregateBuilder::new(record.fixture))
            .ingest(record);
    }
    builders
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Check determinism and win-rate targets over an acceptance-sized sample.
///
/// # Errors
///
/// Fails on any replay mismatch or when a fixture's win rate leaves its target band.
pub fn validate_balance_targets(aggregates: &[BalanceAggregate]) -> Result<()> {
    for aggregate in aggregates {
        ensure!(
            aggregate.replay_failures == 0,
            "{} fixture: {} replays diverged",
            aggregate.fixture.label(),
            aggregate.replay_failures
        );
        let (low, high) = aggregate.fixture.win_rate_target();
        ensure!(
            (low..=high).contains(&aggregate.team_a_win_rate),
            "{} fixture: team A win rate {:.3} outside [{low:.2}, {high:.2}]",
            aggregate.fixture.label(),
            aggregate.team_a_win_rate
        );
    }
    Ok(())
}

struct AggregateBuilder {
    fixture: FixtureKind,
    iterations: u32,
    team_a_wins: u32,
    level_scores: u32,
    replay_failures: usize,
    margin: RunningStats,
    duration: RunningStats,
}

impl AggregateBuilder {
    fn new(fixture: FixtureKind) -> Self {
        Self {
            fixture,
            iterations: 0,
            team_a_wins: 0,
            level_scores: 0,
            replay_failures: 0,
            margin: RunningStats::default(),
            duration: RunningStats::default(),
        }
    }

    fn ingest(&mut self, record: &BalanceRecord) {
        self.iterations = self.iterations.saturating_add(1);
        if record.winner_side == TeamSide::A {
            self.team_a_wins += 1;
        }
        if record.margin() == 0 {
            self.level_scores += 1;
        }
        if !record.replay_matches {
            warn!(
                "{} seed {} did not replay identically",
                record.fixture.label(),
                record.seed_code
            );
            self.replay_failures += 1;
        }
        if !record.mvp_on_winning_side {
            warn!(
                "{} seed {}: winner has no MVP from its own roster",
                record.fixture.label(),
                record.seed_code
            );
        }
        self.margin.add(f64::from(record.margin()));
        self.duration.add(f64::from(record.duration));
    }

    fn finish(self) -> BalanceAggregate {
        let denom = f64::from(self.iterations.max(1));
        BalanceAggregate {
            fixture: self.fixture,
            iterations: usize::try_from(self.iterations).unwrap_or(usize::MAX),
            team_a_win_rate: f64::from(self.team_a_wins) / denom,
            mean_margin: self.margin.mean(),
            std_margin: self.margin.std_dev(),
            mean_duration: self.duration.mean(),
            level_score_rate: f64::from(self.level_scores) / denom,
            replay_failures: self.replay_failures,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fixture: FixtureKind, side: TeamSide, score: [u32; 2]) -> BalanceRecord {
        BalanceRecord {
            fixture,
            seed_code: "EX-DRAGON01".to_string(),
            seed_value: 1,
            winner_side: side,
            score,
            duration: 32,
            mvp_on_winning_side: true,
            replay_matches: true,
        }
    }

    #[test]
    fn generates_records_for_each_fixture() {
        let tester = MatchTester::new(false);
        let seeds = vec![SeedInfo::from_numeric(3)];
        let records = run_balance_analysis(&tester, &seeds, 2).unwrap();
        assert_eq!(records.len(), FixtureKind::ALL.len() * 2);
        assert!(records.iter().all(|r| r.replay_matches));
        assert!(records.iter().all(|r| r.mvp_on_winning_side));
    }

    #[test]
    fn aggregates_track_win_rate_and_margin() {
        let records = vec![
            record(FixtureKind::Favourite, TeamSide::A, [5, 1]),
            record(FixtureKind::Favourite, TeamSide::A, [3, 3]),
            record(FixtureKind::Favourite, TeamSide::B, [1, 3]),
            record(FixtureKind::Mirror, TeamSide::B, [2, 4]),
        ];
        let aggregates = aggregate_balance(&records);
        assert_eq!(aggregates.len(), 2);
        let favourite = &aggregates[0];
        assert_eq!(favourite.fixture, FixtureKind::Favourite);
        assert_eq!(favourite.iterations, 3);
        assert!((favourite.team_a_win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((favourite.mean_margin - 2.0).abs() < 1e-9);
        assert!((favourite.level_score_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((favourite.mean_duration - 32.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_out_of_band_rates() {
        let lopsided = vec![record(FixtureKind::Mirror, TeamSide::A, [4, 1]); 10];
        let aggregates = aggregate_balance(&lopsided);
        assert!(validate_balance_targets(&aggregates).is_err());

        let mut even = vec![record(FixtureKind::Mirror, TeamSide::A, [4, 1]); 5];
        even.extend(vec![record(FixtureKind::Mirror, TeamSide::B, [1, 4]); 5]);
        assert!(validate_balance_targets(&aggregate_balance(&even)).is_ok());
    }

    #[test]
    fn favourite_must_clear_sixty_five_percent() {
        let mut weak = vec![record(FixtureKind::Favourite, TeamSide::A, [4, 2]); 6];
        weak.extend(vec![record(FixtureKind::Favourite, TeamSide::B, [2, 4]); 4]);
        assert!(validate_balance_targets(&aggregate_balance(&weak)).is_err());

        let mut strong = vec![record(FixtureKind::Favourite, TeamSide::A, [4, 2]); 7];
        strong.extend(vec![record(FixtureKind::Favourite, TeamSide::B, [2, 4]); 3]);
        assert!(validate_balance_targets(&aggregate_balance(&strong)).is_ok());
    }

    #[test]
    fn validate_rejects_replay_divergence() {
        let mut diverged = record(FixtureKind::Mismatch, TeamSide::A, [6, 1]);
        diverged.replay_matches = false;
        let aggregates = aggregate_balance(&[diverged]);
        assert!(validate_balance_targets(&aggregates).is_err());
    }
}
