pub mod balance;
pub mod match_tester;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use balance::{
    BalanceAggregate, BalanceRecord, aggregate_balance, run_balance_analysis,
    validate_balance_targets,
};
pub use match_tester::{Expectation, FixtureKind, MatchPlan, MatchSummary, MatchTester};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
