mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{all_scenario_keys, get_scenario, list_scenarios};
use common::split_csv;
use logic::{
    BalanceAggregate, BalanceRecord, LogicTester, MatchTester, SeedInfo, aggregate_balance,
    resolve_seed_inputs, run_balance_analysis, validate_balance_targets,
};

const ACCEPTANCE_ITERATIONS: usize = 100;

#[derive(Debug, Parser)]
#[command(name = "dreamleague-tester", version = "0.1.0")]
#[command(about = "Automated QA sweeps for the Dream League match engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated numbers or share codes, or `all`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of consecutive seeds played per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Run extended balance sweeps (at least 100 iterations) and enforce win-rate targets
    #[arg(long)]
    acceptance: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let balance_iterations = compute_balance_iterations(&args);
    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;
    let seeds: Vec<u64> = seed_infos.iter().map(|s| s.seed).collect();
    let tester = MatchTester::new(args.verbose);

    let all_results = run_logic_scenarios(&args, &scenarios, &seeds, tester);

    let (balance_records, balance_aggregates) =
        gather_balance(&args, tester, &seed_infos, balance_iterations)?;

    write_reports(
        &args,
        &all_results,
        balance_records.as_deref(),
        balance_aggregates.as_deref(),
        start_time,
    )?;

    if args.acceptance
        && let Some(aggregates) = balance_aggregates.as_ref()
    {
        validate_balance_targets(aggregates)?;
    }

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏆 Dream League Match Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn compute_balance_iterations(args: &Args) -> usize {
    if args.acceptance {
        if args.iterations < ACCEPTANCE_ITERATIONS {
            println!(
                "🔁 Acceptance mode enabled: increasing balance iterations from {} to {ACCEPTANCE_ITERATIONS}",
                args.iterations
            );
        } else {
            println!(
                "🔁 Acceptance mode enabled: using {} balance iterations",
                args.iterations
            );
        }
        args.iterations.max(ACCEPTANCE_ITERATIONS)
    } else {
        args.iterations
    }
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for key in all_scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    tester: MatchTester,
) -> Vec<logic::ScenarioResult> {
    let mut results: Vec<logic::ScenarioResult> = Vec::new();

    println!("{}", "🧠 Running Match Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(tester);
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

type BalanceSummary = (Option<Vec<BalanceRecord>>, Option<Vec<BalanceAggregate>>);

fn gather_balance(
    args: &Args,
    tester: MatchTester,
    seed_infos: &[SeedInfo],
    iterations: usize,
) -> Result<BalanceSummary> {
    let require_balance = args.acceptance || matches!(args.report.as_str(), "console" | "csv");
    if !require_balance {
        return Ok((None, None));
    }
    let records = run_balance_analysis(&tester, seed_infos, iterations)?;
    let aggregates = aggregate_balance(&records);
    Ok((Some(records), Some(aggregates)))
}

fn write_reports(
    args: &Args,
    results: &[logic::ScenarioResult],
    balance_records: Option<&[BalanceRecord]>,
    balance_aggregates: Option<&[BalanceAggregate]>,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(output_target.writer(), results)?;
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Dream League Match Engine Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(output_target.writer(), results)?;
            }
        }
        "csv" => {
            logic::reports::generate_csv_report(
                output_target.writer(),
                balance_records.unwrap_or(&[]),
            )?;
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No match scenarios executed.")?;
            }
            logic::reports::generate_console_report(
                output_target.writer(),
                results,
                balance_aggregates.unwrap_or(&[]),
                start_time.elapsed(),
            )?;
        }
    }

    if args.report != "json" && args.report != "csv" {
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::FixtureKind;
    use dreamleague_sim::TeamSide;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            acceptance: false,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dreamleague-{}-{name}", std::process::id()))
    }

    fn sample_result(passed: bool) -> logic::ScenarioResult {
        logic::ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 1337,
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures: Vec::new(),
            average_duration: Duration::from_millis(5),
            performance_data: vec![Duration::from_millis(5)],
        }
    }

    fn sample_record() -> BalanceRecord {
        BalanceRecord {
            fixture: FixtureKind::Favourite,
            seed_code: "EX-DRAGON42".to_string(),
            seed_value: 42,
            winner_side: TeamSide::A,
            score: [4, 2],
            duration: 33,
            mvp_on_winning_side: true,
            replay_matches: true,
        }
    }

    #[test]
    fn expand_scenarios_replaces_all() {
        let scenarios = expand_scenarios("smoke,all");
        assert_eq!(scenarios[0], "smoke");
        assert_eq!(scenarios.len(), list_scenarios().len());
        assert!(!scenarios.iter().any(|s| s == "all"));
    }

    #[test]
    fn acceptance_raises_iterations() {
        let args = Args {
            acceptance: true,
            ..base_args()
        };
        assert_eq!(compute_balance_iterations(&args), ACCEPTANCE_ITERATIONS);
        assert_eq!(compute_balance_iterations(&base_args()), 1);
    }

    #[test]
    fn write_reports_emits_markdown() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], None, None, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Dream League Match Engine Test Results"));
        assert!(content.contains("Smoke Test"));
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(false)], None, None, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        let parsed: Vec<logic::ScenarioResult> = serde_json::from_str(&content).unwrap();
        assert!(!parsed[0].passed);
    }

    #[test]
    fn write_reports_emits_csv_report() {
        let temp = temp_file("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let records = [sample_record()];
        write_reports(&args, &[], Some(&records), None, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.starts_with("fixture,seed_code"));
        assert!(content.contains("EX-DRAGON42"));
    }

    #[test]
    fn write_reports_emits_console_with_balance() {
        let temp = temp_file("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let aggregates = aggregate_balance(&[sample_record()]);
        write_reports(
            &args,
            &[sample_result(true)],
            None,
            Some(&aggregates),
            Instant::now(),
        )
        .unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Balance Summary"));
        assert!(content.contains("favourite"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }

    #[test]
    fn run_logic_scenarios_skips_unknown_names() {
        let args = base_args();
        let results = run_logic_scenarios(
            &args,
            &["smoke".to_string(), "browser".to_string()],
            &[7],
            MatchTester::new(false),
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }
}
