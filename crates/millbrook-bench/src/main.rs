use std::path::PathBuf;

use clap::{Parser, Subcommand};

use millbrook_bench::calibration::CalibrationRunner;
use millbrook_bench::config::{CalibrationConfig, ResolvedOutputs};
use millbrook_bench::logging::init_logging;
use millbrook_bench::replay::{Scorecard, replay};

/// Tooling around the Millbrook settlement engine.
#[derive(Debug, Parser)]
#[command(
    name = "millbrook-bench",
    author,
    version,
    about = "Ghost calibration and scorecard replay for the Millbrook engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate ghost rounds and compare them with the handicap bands.
    Calibrate {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE", default_value = "bench/calibration.yaml")]
        config: PathBuf,

        /// Override the run identifier (substitutes {run_id} templates).
        #[arg(long, value_name = "RUN_ID")]
        run_id: Option<String>,

        /// Override the number of rounds per handicap.
        #[arg(long, value_name = "ROUNDS")]
        rounds: Option<usize>,

        /// Override the RNG seed for ghost seeds.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Exit after validating the configuration (nothing is simulated).
        #[arg(long)]
        validate_only: bool,
    },
    /// Play a scripted scorecard through the engine and write the ledger CSV.
    Replay {
        /// Path to the scorecard YAML.
        #[arg(value_name = "CARD")]
        card: PathBuf,

        /// Where the ledger CSV is written.
        #[arg(short, long, value_name = "FILE", default_value = "ledger.csv")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Calibrate {
            config,
            run_id,
            rounds,
            seed,
            validate_only,
        } => calibrate(config, run_id, rounds, seed, validate_only),
        Command::Replay { card, output } => replay_card(card, output),
    }
}

fn calibrate(
    path: PathBuf,
    run_id: Option<String>,
    rounds: Option<usize>,
    seed: Option<u64>,
    validate_only: bool,
) -> anyhow::Result<()> {
    let mut config = CalibrationConfig::from_path(&path)?;

    if let Some(run_id) = run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = rounds {
        config.ghosts.rounds = rounds;
    }

    if let Some(seed) = seed {
        config.ghosts.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let handicap_count = config.ghosts.handicaps.len();
    let run_id = config.run_id.clone();
    let rounds = config.ghosts.rounds;

    println!(
        "Loaded configuration '{run_id}' with {handicap_count} handicap{} ({rounds} rounds each)",
        if handicap_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = CalibrationRunner::new(config, outputs)?;

    if validate_only {
        println!("Validation-only mode: calibration skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Calibration complete for '{run_id}': {} handicaps → {} rows at {}",
        summary.handicaps,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for report in &summary.analytics.handicaps {
        println!(
            "  {:>5.1}: mean {:+.2} (model {:+.2}), birdies {:.2}% vs band {:.2}% (p={:.3})",
            report.index,
            report.mean_to_par,
            report.expected_to_par,
            report.birdie_rate * 100.0,
            report.expected_birdie_rate * 100.0,
            report.birdie_p_value
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

fn replay_card(card: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let scorecard = Scorecard::from_path(&card)?;
    let summary = replay(&scorecard, &output)?;

    println!(
        "Replayed {} hole{} ({})",
        summary.holes_played,
        if summary.holes_played == 1 { "" } else { "s" },
        summary.status
    );
    for (name, total) in &summary.standings {
        println!("  {name:<24} {:>10}", total.to_string());
    }
    if let Some(total) = summary.big_game_total {
        println!("Big Game total: {total}");
    }
    if summary.doubles_rejected > 0 {
        println!(
            "{} double call{} on the card were not available",
            summary.doubles_rejected,
            if summary.doubles_rejected == 1 { "" } else { "s" }
        );
    }
    println!("Ledger CSV: {}", summary.csv_path.display());
    Ok(())
}
