use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;
use super::balance::{BalanceAggregate, BalanceRecord};

fn success_rate(results: &[ScenarioResult]) -> (usize, usize, f64) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let rate = if total == 0 {
        0.0
    } else {
        f64::from(u32::try_from(passed).unwrap_or(u32::MAX))
            / f64::from(u32::try_from(total).unwrap_or(u32::MAX))
            * 100.0
    };
    (total, passed, rate)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    aggregates: &[BalanceAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Match Engine Test Results".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    let (total, passed, rate) = success_rate(results);
    writeln!(out, "Total scenario runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} (seed {})",
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", "⚖️  Balance Summary".bright_yellow().bold())?;
    writeln!(out, "{}", "==================".yellow())?;
    if aggregates.is_empty() {
        writeln!(out, "No balance data collected.")?;
    }
    for aggregate in aggregates {
        writeln!(
            out,
            "{:10} runs {:5}  A wins {:5.1}%  margin {:.2} ± {:.2}  level {:4.1}%  duration {:.1} min",
            aggregate.fixture.label(),
            aggregate.iterations,
            aggregate.team_a_win_rate * 100.0,
            aggregate.mean_margin,
            aggregate.std_margin,
            aggregate.level_score_rate * 100.0,
            aggregate.mean_duration
        )?;
        if aggregate.replay_failures > 0 {
            writeln!(
                out,
                "   {}",
                format!("{} replays diverged", aggregate.replay_failures).red()
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Dream League Match Engine Test Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    let (total, passed, rate) = success_rate(results);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenario runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (seed {})\n", result.scenario_name, result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[BalanceRecord]) -> Result<()> {
    writeln!(
        out,
        "fixture,seed_code,seed,winner,score_a,score_b,margin,duration,mvp_on_winner,replay_ok"
    )?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            record.fixture.label(),
            record.seed_code,
            record.seed_value,
            record.winner_side,
            record.score[0],
            record.score[1],
            record.margin(),
            record.duration,
            record.mvp_on_winning_side,
            record.replay_matches
        )?;
    }
    Ok(())
}
