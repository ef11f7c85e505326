use dreamleague_sim::performance::calculate_team_performance_with_jitter;
use dreamleague_sim::{
    MatchRng, MatchSimulationEngine, Player, PlayerAttributes, Position, Team, TeamSide,
    calculate_team_performance, simulate_match,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::convert::TryFrom;

const SAMPLE_SIZE: u64 = 1000;

fn roster(prefix: &str, ratings: [f64; 5]) -> Vec<Player> {
    ["Top Laner", "Jungler", "Mid Laner", "AD Carry", "Support"]
        .iter()
        .zip(ratings)
        .enumerate()
        .map(|(idx, (label, rating))| {
            Player::new(
                format!("{prefix}-{idx}"),
                format!("{prefix} {label}"),
                Position::from_label(label),
                PlayerAttributes::uniform(rating),
            )
        })
        .collect()
}

fn win_rate(team_a: &Team, team_b: &Team, roster_a: &[Player], roster_b: &[Player]) -> f64 {
    let mut wins = 0_u32;
    for seed in 0..SAMPLE_SIZE {
        let result = simulate_match(team_a, team_b, roster_a, roster_b, seed).unwrap();
        if result.outcome.winner_side == TeamSide::A {
            wins += 1;
        }
    }
    f64::from(wins) / f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"))
}

fn favourite_fixture() -> (Team, Team, Vec<Player>, Vec<Player>) {
    let roster_a = roster("phantom", [84.0, 80.0, 86.0, 82.0, 78.0]);
    let roster_b = roster("wolves", [76.0, 79.0, 80.0, 77.0, 78.0]);
    let team_a = Team::new("phantom", "Phantom Legends", 88.0).with_roster(&roster_a);
    let team_b = Team::new("wolves", "Cyber Wolves", 80.0).with_roster(&roster_b);
    (team_a, team_b, roster_a, roster_b)
}

#[test]
fn stronger_team_wins_most_but_not_all() {
    let (team_a, team_b, roster_a, roster_b) = favourite_fixture();

    let observed = win_rate(&team_a, &team_b, &roster_a, &roster_b);
    assert!(
        (0.65..0.95).contains(&observed),
        "favourite win rate drifted: observed {observed:.3}"
    );
}

// The score stream makes one draw for the upset roll and more only when the bonus is applied.
#[test]
fn upset_bonus_fires_in_full_matches() {
    let (team_a, team_b, roster_a, roster_b) = favourite_fixture();
    let engine = MatchSimulationEngine::default();
    let mut upsets = 0_u32;
    let mut upset_losses = 0_u32;
    for seed in 0..SAMPLE_SIZE {
        let mut streams = MatchRng::from_user_seed(seed);
        let result = engine
            .run_match(&team_a, &team_b, &roster_a, &roster_b, &mut streams)
            .unwrap();
        let draws = streams.score().draws();
        assert!(draws >= 1, "seed {seed} never rolled for an upset");
        if draws > 1 {
            upsets += 1;
            if result.outcome.winner_side == TeamSide::B {
                upset_losses += 1;
            }
        }
    }
    let trials = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let rate = f64::from(upsets) / trials;
    assert!(
        (0.12..0.28).contains(&rate),
        "upset rate drifted: observed {rate:.3}"
    );
    assert!(upset_losses > 0, "no upset ever cost the favourite a match");
}

#[test]
fn overwhelming_gap_is_nearly_decisive() {
    let roster_a = roster("giants", [90.0; 5]);
    let roster_b = roster("minnows", [55.0; 5]);
    let team_a = Team::new("giants", "Giants", 90.0).with_roster(&roster_a);
    let team_b = Team::new("minnows", "Minnows", 50.0).with_roster(&roster_b);

    let observed = win_rate(&team_a, &team_b, &roster_a, &roster_b);
    assert!(observed > 0.95, "gap not decisive: observed {observed:.3}");
}

#[test]
fn mirror_match_is_close_to_even() {
    let roster_a = roster("left", [75.0; 5]);
    let roster_b = roster("right", [75.0; 5]);
    let team_a = Team::new("left", "Left", 60.0).with_roster(&roster_a);
    let team_b = Team::new("right", "Right", 60.0).with_roster(&roster_b);

    let observed = win_rate(&team_a, &team_b, &roster_a, &roster_b);
    assert!(
        (0.35..=0.65).contains(&observed),
        "mirror match skewed: observed {observed:.3}"
    );
}

#[test]
fn rating_rises_with_attributes_and_synergy() {
    let team_low = Team::new("t", "T", 40.0);
    let team_high = Team::new("t", "T", 90.0);
    let weak = roster("w", [60.0; 5]);
    let strong = roster("s", [80.0; 5]);
    let fixed = (1.0, 1.0);
    let mut rng = SmallRng::seed_from_u64(11);

    let rate = |team: &Team, players: &[Player], rng: &mut SmallRng| {
        calculate_team_performance_with_jitter(team, players, fixed, rng)
            .unwrap()
            .overall
    };
    assert!(rate(&team_low, &strong, &mut rng) > rate(&team_low, &weak, &mut rng));
    assert!(rate(&team_high, &weak, &mut rng) > rate(&team_low, &weak, &mut rng));

    for _ in 0..SAMPLE_SIZE {
        let jittered = calculate_team_performance(&team_low, &weak, &mut rng)
            .unwrap()
            .overall;
        let base = rate(&team_low, &weak, &mut rng);
        assert!(jittered >= base * 0.9 - 1e-9 && jittered < base * 1.1 + 1e-9);
    }
}
