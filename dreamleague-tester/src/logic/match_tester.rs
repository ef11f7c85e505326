use anyhow::{Context, Result};
use dreamleague_sim::{
    MatchKind, MatchResult, Player, PlayerAttributes, PlayerProgress, Position, Team,
    encode_friendly, progress_for_match, simulate_match,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Check run against every simulated match of a plan.
pub type Expectation = fn(&MatchSummary) -> Result<()>;

const POSITION_LABELS: [&str; 5] = ["Top Laner", "Jungler", "Mid Laner", "AD Carry", "Support"];

/// Canned matchups; team A is never the weaker side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Favourite,
    Mirror,
    Mismatch,
}

impl FixtureKind {
    pub const ALL: [Self; 3] = [Self::Favourite, Self::Mirror, Self::Mismatch];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favourite => "favourite",
            Self::Mirror => "mirror",
            Self::Mismatch => "mismatch",
        }
    }

    /// Acceptable share of wins for team A over a large sample.
    #[must_use]
    pub const fn win_rate_target(self) -> (f64, f64) {
        match self {
            Self::Favourite => (0.65, 0.95),
            Self::Mirror => (0.35, 0.65),
            Self::Mismatch => (0.90, 1.0),
        }
    }

    #[must_use]
    pub fn build(self) -> Fixture {
        match self {
            Self::Favourite => Fixture::new(
                self,
                ("phantom", "Phantom Legends", 88.0, [84.0, 80.0, 86.0, 82.0, 78.0]),
                ("wolves", "Cyber Wolves", 80.0, [76.0, 79.0, 80.0, 77.0, 78.0]),
            ),
            Self::Mirror => Fixture::new(
                self,
                ("azure", "Azure Tide", 60.0, [75.0; 5]),
                ("crimson", "Crimson Tide", 60.0, [75.0; 5]),
            ),
            Self::Mismatch => Fixture::new(
                self,
                ("titans", "Iron Titans", 90.0, [90.0; 5]),
                ("rookies", "Academy Rookies", 50.0, [55.0; 5]),
            ),
        }
    }
}

type TeamBlueprint = (&'static str, &'static str, f64, [f64; 5]);

#[derive(Debug, Clone)]
pub struct Fixture {
    pub kind: FixtureKind,
    pub team_a: Team,
    pub team_b: Team,
    pub roster_a: Vec<Player>,
    pub roster_b: Vec<Player>,
}

impl Fixture {
    fn new(kind: FixtureKind, a: TeamBlueprint, b: TeamBlueprint) -> Self {
        let (team_a, roster_a) = build_team(a);
        let (team_b, roster_b) = build_team(b);
        Self {
            kind,
            team_a,
            team_b,
            roster_a,
            roster_b,
        }
    }
}

fn build_team((id, name, synergy, ratings): TeamBlueprint) -> (Team, Vec<Player>) {
    let roster: Vec<Player> = POSITION_LABELS
        .iter()
        .zip(ratings)
        .map(|(label, rating)| {
            Player::new(
                format!("{id}-{}", label.to_lowercase().replace(' ', "-")),
                format!("{name} {label}"),
                Position::from_label(label),
                PlayerAttributes::uniform(rating),
            )
        })
        .collect();
    let team = Team::new(id, name, synergy).with_roster(&roster);
    (team, roster)
}

#[derive(Debug, Clone)]
pub struct MatchPlan {
    pub fixture: FixtureKind,
    pub kind: MatchKind,
    pub expectations: Vec<Expectation>,
}

impl MatchPlan {
    #[must_use]
    pub const fn new(fixture: FixtureKind) -> Self {
        Self {
            fixture,
            kind: MatchKind::Exhibition,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: MatchKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Everything observed while playing one plan for one seed.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub seed: u64,
    pub share_code: String,
    pub kind: MatchKind,
    pub fixture: Fixture,
    pub result: MatchResult,
    pub progress: Vec<PlayerProgress>,
    pub digest: String,
    pub replay_digest: String,
}

impl MatchSummary {
    #[must_use]
    pub fn replay_matches(&self) -> bool {
        self.digest == self.replay_digest
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchTester {
    verbose: bool,
}

impl MatchTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Play `plan` for `seed` twice and collect the first run plus a digest of the replay.
    ///
    /// # Errors
    ///
    /// Fails when the engine rejects the fixture or the result cannot be serialized.
    pub fn run_plan(&self, plan: &MatchPlan, seed: u64) -> Result<MatchSummary> {
        let fixture = plan.fixture.build();
        let play = || {
            simulate_match(
                &fixture.team_a,
                &fixture.team_b,
                &fixture.roster_a,
                &fixture.roster_b,
                seed,
            )
            .with_context(|| format!("{} fixture failed for seed {seed}", plan.fixture.label()))
        };
        let result = play()?;
        let replay = play()?;
        let digest = result_digest(&result)?;
        let replay_digest = result_digest(&replay)?;
        let progress = progress_for_match(
            &result.outcome,
            &fixture.roster_a,
            &fixture.roster_b,
            seed,
        );

        if self.verbose {
            log::debug!(
                "{} seed {seed}: {}-{} digest {}",
                plan.fixture.label(),
                result.outcome.score[0],
                result.outcome.score[1],
                &digest[..12]
            );
        }

        Ok(MatchSummary {
            seed,
            share_code: encode_friendly(plan.kind, seed),
            kind: plan.kind,
            fixture,
            result,
            progress,
            digest,
            replay_digest,
        })
    }
}

/// Hex SHA-256 of the serialized result.
///
/// # Errors
///
/// Fails when the result cannot be serialized.
pub fn result_digest(result: &MatchResult) -> Result<String> {
    let bytes = serde_json::to_vec(result).context("serializing match result")?;
    let hex: String = Sha256::digest(&bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();
    Ok(hex)
}
