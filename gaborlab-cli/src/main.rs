//! GaborLab CLI — trial-list generation, headless simulation, and result
//! processing.
//!
//! Commands:
//! - `generate` — build a trial list from a preset or config file and export
//!   it as CSV or JSON
//! - `simulate` — run a full session headlessly against a scripted responder
//!   and save the artifact bundle
//! - `summarize` — aggregate saved sessions into psychometric-curve-ready
//!   counts

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gaborlab_core::{generate_ensemble_trials, generate_trials, ResponseKey, SeedSchedule};
use gaborlab_runner::{
    abort_flag, export_ensemble_trial_list_csv, export_trial_list_csv, run_session,
    save_artifacts, summarize_directory, ScriptedPresenter, SessionConfig, SessionOutcome,
    SessionResult, Variant,
};

#[derive(Parser)]
#[command(
    name = "gaborlab",
    about = "GaborLab CLI — single/ensemble orientation-judgement experiment engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    /// First version: flanker-offset tables.
    Flanker,
    /// Second version: ensemble orientation pools.
    Ensemble,
    /// Practice trials with feedback.
    Practice,
}

impl From<PresetArg> for Variant {
    fn from(arg: PresetArg) -> Variant {
        match arg {
            PresetArg::Flanker => Variant::Flanker,
            PresetArg::Ensemble => Variant::Ensemble,
            PresetArg::Practice => Variant::Practice,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResponderArg {
    /// Uniformly random f/j responses.
    Random,
    /// Always answer clockwise.
    Clockwise,
    /// Always answer anticlockwise.
    Anticlockwise,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a trial list and export it.
    Generate {
        /// Named preset: flanker, ensemble, practice.
        #[arg(long)]
        preset: Option<PresetArg>,

        /// Path to a TOML session config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Master seed. Defaults to OS entropy.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format.
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
    },
    /// Run a session headlessly against a scripted responder.
    Simulate {
        /// Named preset: flanker, ensemble, practice.
        #[arg(long)]
        preset: Option<PresetArg>,

        /// Path to a TOML session config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Master seed. Defaults to OS entropy.
        #[arg(long)]
        seed: Option<u64>,

        /// How the scripted observer answers.
        #[arg(long, value_enum, default_value_t = ResponderArg::Random)]
        responses: ResponderArg,

        /// Directory for the artifact bundle.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Aggregate saved sessions into per-condition summaries.
    Summarize {
        /// Directory holding saved session bundles.
        #[arg(long, default_value = "results")]
        input_dir: PathBuf,

        /// Directory for the processed CSV files.
        #[arg(long, default_value = "processed")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            config,
            seed,
            output,
            format,
        } => run_generate(preset, config, seed, output, format),
        Commands::Simulate {
            preset,
            config,
            seed,
            responses,
            output_dir,
        } => run_simulate(preset, config, seed, responses, output_dir),
        Commands::Summarize {
            input_dir,
            output_dir,
        } => run_summarize(input_dir, output_dir),
    }
}

/// Resolve the session config from --preset/--config (mutually exclusive).
fn resolve_config(
    preset: Option<PresetArg>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<SessionConfig> {
    if preset.is_some() && config_path.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }
    let mut config = match (preset, config_path) {
        (Some(preset), None) => SessionConfig::preset(preset.into()),
        (None, Some(path)) => SessionConfig::from_file(&path)?,
        (None, None) => bail!("one of --config or --preset is required"),
        _ => unreachable!(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

fn run_generate(
    preset: Option<PresetArg>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    format: FormatArg,
) -> Result<()> {
    let config = resolve_config(preset, config_path, seed)?;
    let seed = config.resolve_seed();
    let schedule = SeedSchedule::new(seed);

    let (text, count) = match config.variant {
        Variant::Flanker => {
            let factors = config.flanker_factors();
            let trials = generate_trials(&factors, &mut schedule.trial_list_rng())?;
            let text = match format {
                FormatArg::Csv => export_trial_list_csv(&trials)?,
                FormatArg::Json => serde_json::to_string_pretty(&trials)?,
            };
            (text, trials.len())
        }
        Variant::Ensemble | Variant::Practice => {
            let factors = config.ensemble_factors();
            let trials = generate_ensemble_trials(&factors, &mut schedule.trial_list_rng())?;
            let text = match format {
                FormatArg::Csv => export_ensemble_trial_list_csv(&trials)?,
                FormatArg::Json => serde_json::to_string_pretty(&trials)?,
            };
            (text, trials.len())
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, text)?;
            eprintln!("Wrote {count} trials (seed {seed}) to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn run_simulate(
    preset: Option<PresetArg>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    responses: ResponderArg,
    output_dir: PathBuf,
) -> Result<()> {
    let config = resolve_config(preset, config_path, seed)?;

    // enough responses for the whole list, whatever the variant
    let planned = match config.variant {
        Variant::Flanker => config.flanker_factors().size(),
        Variant::Ensemble | Variant::Practice => config.ensemble_factors().size(),
    };
    let planned = config.max_trials.map_or(planned, |max| planned.min(max));

    let mut presenter = match responses {
        ResponderArg::Random => ScriptedPresenter::random(config.resolve_seed(), planned),
        ResponderArg::Clockwise => ScriptedPresenter::always(ResponseKey::Clockwise, planned),
        ResponderArg::Anticlockwise => {
            ScriptedPresenter::always(ResponseKey::Anticlockwise, planned)
        }
    };

    let result = run_session(&config, &mut presenter, abort_flag())?;
    print_summary(&result);

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn run_summarize(input_dir: PathBuf, output_dir: PathBuf) -> Result<()> {
    if !input_dir.exists() {
        bail!("input directory does not exist: {}", input_dir.display());
    }

    let written = summarize_directory(&input_dir, &output_dir)?;
    if written.is_empty() {
        println!("No saved sessions found in {}", input_dir.display());
        return Ok(());
    }

    println!("Processed {} session(s):", written.len());
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &SessionResult) {
    let mean_latency = if result.records.is_empty() {
        0.0
    } else {
        result.records.iter().map(|r| r.latency).sum::<f64>() / result.records.len() as f64
    };

    println!();
    println!("=== Session Result ===");
    println!("Session ID:     {}", result.session_id);
    println!("Variant:        {:?}", result.variant);
    println!("Participant:    {}", result.participant.name);
    println!("Master Seed:    {}", result.master_seed);
    println!(
        "Trials:         {} of {} planned",
        result.records.len(),
        result.planned_trials
    );
    println!("Mean Latency:   {mean_latency:.3}s");
    match result.outcome {
        SessionOutcome::Completed => println!("Outcome:        completed"),
        SessionOutcome::Aborted { completed } => {
            println!("Outcome:        aborted after {completed} trial(s)")
        }
    }
    println!();
}
