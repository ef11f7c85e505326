pub mod catalog;

use crate::logic::MatchPlan;
use catalog::find_catalog_scenario;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: MatchPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: MatchPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// CLI key, aliases, and catalog name for every scenario.
const SCENARIOS: [(&str, &[&str], &str); 9] = [
    ("smoke", &[], "Smoke Test"),
    ("deterministic-replay", &["deterministic", "replay"], "Deterministic Replay"),
    ("event-timeline", &["events", "timeline"], "Event Timeline"),
    ("stats-integrity", &["stats"], "Stats Integrity"),
    ("commentary-coverage", &["commentary"], "Commentary Coverage"),
    ("progression-bounds", &["progression"], "Progression Bounds"),
    ("share-code-consistency", &["share-code"], "Share Code Consistency"),
    ("narration", &["audio"], "Narration Dry Run"),
    ("full-match", &["full", "audit"], "Full Match Audit"),
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.to_lowercase();
    SCENARIOS
        .iter()
        .find(|(primary, aliases, _)| *primary == key || aliases.contains(&key.as_str()))
        .and_then(|(_, _, catalog_name)| find_catalog_scenario(catalog_name))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS
        .iter()
        .map(|(key, _, description)| (*key, *description))
        .collect()
}

/// Primary keys of every scenario, in listing order.
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS
        .iter()
        .map(|(key, _, _)| (*key).to_string())
        .collect()
}
