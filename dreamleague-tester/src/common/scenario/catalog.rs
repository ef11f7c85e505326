use anyhow::{Context, Result, ensure};
use dreamleague_sim::{
    AudioNarrator, GamePhase, MatchKind, NarrationOptions, TeamSide, VoiceProfile,
    apply_progress, encode_friendly, narrate_commentary, parse_share_code,
};
use std::convert::Infallible;

use super::TestScenario;
use crate::logic::{FixtureKind, MatchPlan, MatchSummary};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "Smoke Test",
            MatchPlan::new(FixtureKind::Favourite).with_expectation(outcome_expectation),
        ),
        TestScenario::new(
            "Deterministic Replay",
            MatchPlan::new(FixtureKind::Mirror).with_expectation(replay_expectation),
        ),
        TestScenario::new(
            "Event Timeline",
            MatchPlan::new(FixtureKind::Favourite).with_expectation(timeline_expectation),
        ),
        TestScenario::new(
            "Stats Integrity",
            MatchPlan::new(FixtureKind::Mismatch).with_expectation(stats_expectation),
        ),
        TestScenario::new(
            "Commentary Coverage",
            MatchPlan::new(FixtureKind::Favourite).with_expectation(commentary_expectation),
        ),
        TestScenario::new(
            "Progression Bounds",
            MatchPlan::new(FixtureKind::Mirror).with_expectation(progression_expectation),
        ),
        TestScenario::new(
            "Share Code Consistency",
            MatchPlan::new(FixtureKind::Favourite)
                .with_kind(MatchKind::Tournament)
                .with_expectation(share_code_expectation),
        ),
        TestScenario::new(
            "Narration Dry Run",
            MatchPlan::new(FixtureKind::Mismatch).with_expectation(narration_expectation),
        ),
        TestScenario::new(
            "Full Match Audit",
            MatchPlan::new(FixtureKind::Favourite)
                .with_expectation(outcome_expectation)
                .with_expectation(replay_expectation)
                .with_expectation(timeline_expectation)
                .with_expectation(stats_expectation)
                .with_expectation(commentary_expectation)
                .with_expectation(progression_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn outcome_expectation(summary: &MatchSummary) -> Result<()> {
    let outcome = &summary.result.outcome;
    let fixture = &summary.fixture;
    ensure!(
        outcome.events.len() == 15,
        "expected 15 events, got {}",
        outcome.events.len()
    );
    ensure!(
        outcome.score.iter().all(|&s| s >= 1),
        "score below floor: {:?}",
        outcome.score
    );
    let winner_side = outcome.winner_side;
    ensure!(
        outcome.score_for(winner_side) >= outcome.score_for(winner_side.opponent()),
        "winner {} has the lower score {:?}",
        outcome.winner,
        outcome.score
    );
    let (winner, loser) = match winner_side {
        TeamSide::A => (&fixture.team_a, &fixture.team_b),
        TeamSide::B => (&fixture.team_b, &fixture.team_a),
    };
    ensure!(outcome.winner == winner.id, "winner id does not match side");
    ensure!(outcome.loser == loser.id, "loser id does not match side");
    Ok(())
}

fn replay_expectation(summary: &MatchSummary) -> Result<()> {
    ensure!(
        summary.replay_matches(),
        "replay digest {} differs from {}",
        summary.replay_digest,
        summary.digest
    );
    Ok(())
}

fn timeline_expectation(summary: &MatchSummary) -> Result<()> {
    let events = &summary.result.outcome.events;
    ensure!(
        events.windows(2).all(|pair| pair[0].time <= pair[1].time),
        "events out of order"
    );
    for phase in GamePhase::ALL {
        let offset = match phase {
            GamePhase::Early => 0,
            GamePhase::Mid => 15,
            GamePhase::Late => 25,
        };
        let in_phase: Vec<_> = events.iter().filter(|e| e.phase == phase).collect();
        ensure!(
            in_phase.len() == 5,
            "{} has {} events",
            phase.key(),
            in_phase.len()
        );
        for event in in_phase {
            ensure!(
                (offset..=offset + 4).contains(&event.time),
                "{} event at minute {} outside its window",
                phase.key(),
                event.time
            );
        }
    }
    for event in events {
        ensure!(
            (1..=3).contains(&event.impact),
            "impact {} out of range",
            event.impact
        );
        let favoured = match event.favored_team {
            TeamSide::A => &summary.fixture.team_a.name,
            TeamSide::B => &summary.fixture.team_b.name,
        };
        ensure!(
            event.description.contains(favoured.as_str()),
            "description '{}' does not name {favoured}",
            event.description
        );
    }
    Ok(())
}

fn stats_expectation(summary: &MatchSummary) -> Result<()> {
    let outcome = &summary.result.outcome;
    let stats = &outcome.stats;
    let fixture = &summary.fixture;
    ensure!(
        stats.player_performances.len() == fixture.roster_a.len() + fixture.roster_b.len(),
        "missing box scores"
    );
    for player in fixture.roster_a.iter().chain(&fixture.roster_b) {
        let perf = stats
            .performance(&player.id)
            .with_context(|| format!("no box score for {}", player.id))?;
        ensure!(
            (0.0..=10.0).contains(&perf.performance_score),
            "performance score {} out of range",
            perf.performance_score
        );
        ensure!(perf.deaths >= 1, "{} never died", player.id);
    }
    for (side, roster) in [
        (TeamSide::A, &fixture.roster_a),
        (TeamSide::B, &fixture.roster_b),
    ] {
        let mvp = stats
            .team_stats
            .side(side)
            .mvp
            .as_ref()
            .with_context(|| format!("{side} has no MVP"))?;
        ensure!(
            roster.iter().any(|p| p.id == mvp.id),
            "{side} MVP {} is not on the roster",
            mvp.id
        );
    }
    let pair = &stats.team_stats;
    let tallied = [&pair.team_a, &pair.team_b]
        .iter()
        .map(|t| t.objectives + t.teamfights + t.plays)
        .sum::<u32>();
    ensure!(
        usize::try_from(tallied).unwrap_or(usize::MAX) == outcome.events.len(),
        "tallied {tallied} events"
    );
    let last = outcome.events.iter().map(|e| e.time).max().unwrap_or(25);
    ensure!(
        stats.duration == last + 5,
        "duration {} does not follow last event at {last}",
        stats.duration
    );
    Ok(())
}

fn commentary_expectation(summary: &MatchSummary) -> Result<()> {
    let lines = &summary.result.commentary;
    let events = &summary.result.outcome.events;
    let duration = summary.result.outcome.stats.duration;
    ensure!(
        lines.len() == events.len() + 3,
        "expected {} commentary lines, got {}",
        events.len() + 3,
        lines.len()
    );
    ensure!(lines[0].time == 0, "intro not at kickoff");
    for (line, event) in lines[1..=events.len()].iter().zip(events) {
        ensure!(line.time == event.time, "line at {} for event at {}", line.time, event.time);
        ensure!(
            (1..=5).contains(&line.excitement),
            "excitement {} out of range",
            line.excitement
        );
    }
    let closing = &lines[events.len() + 1..];
    ensure!(closing[0].time == duration, "conclusion not at final whistle");
    ensure!(closing[1].time == duration + 1, "MVP line not after conclusion");
    ensure!(
        closing[0].text.contains(&duration.to_string()),
        "conclusion does not state the duration"
    );
    Ok(())
}

fn progression_expectation(summary: &MatchSummary) -> Result<()> {
    let outcome = &summary.result.outcome;
    let fixture = &summary.fixture;
    ensure!(
        summary.progress.len() == fixture.roster_a.len() + fixture.roster_b.len(),
        "progress missing for some players"
    );
    let winners = match outcome.winner_side {
        TeamSide::A => &fixture.roster_a,
        TeamSide::B => &fixture.roster_b,
    };
    let mvps: Vec<_> = summary.progress.iter().filter(|p| p.is_mvp).collect();
    ensure!(mvps.len() == 1, "expected one MVP, found {}", mvps.len());
    ensure!(
        winners.iter().any(|p| p.id == mvps[0].player_id),
        "MVP {} is not on the winning side",
        mvps[0].player_id
    );

    for (player, progress) in fixture
        .roster_a
        .iter()
        .chain(&fixture.roster_b)
        .zip(&summary.progress)
    {
        ensure!(progress.player_id == player.id, "progress out of roster order");
        ensure!(progress.exp_gained > 0, "{} earned no experience", player.id);
        let won = winners.iter().any(|p| p.id == player.id);
        let skills = [
            progress.mechanical_change,
            progress.game_knowledge_change,
            progress.team_communication_change,
            progress.adaptability_change,
            progress.consistency_change,
        ];
        ensure!(
            skills.iter().all(|d| (-3..=5).contains(d)),
            "skill delta out of range for {}",
            player.id
        );
        let form_range = if won { 3..=10 } else { -7..=2 };
        ensure!(
            form_range.contains(&progress.form_change),
            "form change {} out of range for {}",
            progress.form_change,
            player.id
        );

        let mut attributes = player.attributes.clone();
        apply_progress(&mut attributes, progress);
        ensure!(
            (1.0..=100.0).contains(&attributes.mechanical),
            "mechanical left its bounds"
        );
        ensure!(
            attributes.form.is_some_and(|form| (0.0..=100.0).contains(&form)),
            "form left its bounds"
        );
    }
    Ok(())
}

fn share_code_expectation(summary: &MatchSummary) -> Result<()> {
    let (kind, seed) = parse_share_code(&summary.share_code)
        .with_context(|| format!("failed to parse {}", summary.share_code))?;
    ensure!(kind == summary.kind, "share code lost its match kind");
    ensure!(
        encode_friendly(kind, seed) == summary.share_code,
        "share code {} did not round-trip",
        summary.share_code
    );
    let lowered = parse_share_code(&summary.share_code.to_lowercase());
    ensure!(lowered == Some((kind, seed)), "share codes should ignore case");
    Ok(())
}

struct TranscriptNarrator;

#[async_trait::async_trait]
impl AudioNarrator for TranscriptNarrator {
    type Handle = (usize, VoiceProfile);
    type Error = Infallible;

    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceProfile,
    ) -> Result<Self::Handle, Self::Error> {
        Ok((text.len(), voice))
    }
}

fn narration_expectation(summary: &MatchSummary) -> Result<()> {
    let lines = &summary.result.commentary;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building narration runtime")?;
    let audio = runtime.block_on(narrate_commentary(
        &TranscriptNarrator,
        lines,
        NarrationOptions::default(),
    ));
    ensure!(audio.len() == lines.len(), "narration skipped lines");
    for (line, clip) in lines.iter().zip(&audio) {
        let &(length, voice) = clip
            .as_ref()
            .with_context(|| format!("no audio at minute {}", line.time))?;
        ensure!(length == line.text.len(), "audio does not match its line");
        ensure!(
            voice.volume <= 1.0 && voice.rate <= 1.3 && voice.pitch <= 1.2,
            "voice profile exceeded its caps"
        );
    }
    Ok(())
}
