//! Cuevalue command-line harness
//!
//! Fitness value of environmental cues under bet-hedging

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cuevalue_common::LogBase;
use cuevalue_core::CueBenefitEstimator;
use cuevalue_sweep::{
    render_estimate, run_sweep, two_state_grid, Preset, Scenario, SweepConfig, SweepReport,
    SWEEP_VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "cuevalue")]
#[command(about = "Optimal bet-hedging strategies and the fitness value of environmental cues")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List built-in scenarios
    Presets,
    /// Estimate the cue benefit of one scenario
    Estimate {
        #[command(flatten)]
        source: ScenarioSource,
        /// Report growth figures in bits
        #[arg(long)]
        bits: bool,
    },
    /// Sweep a two-environment scenario over env = [p, 1 - p]
    Sweep {
        #[command(flatten)]
        source: ScenarioSource,
        #[arg(long)]
        start: Option<f64>,
        #[arg(long)]
        end: Option<f64>,
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        jobs: Option<usize>,
        /// Write the JSON report here
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
        #[arg(long)]
        bits: bool,
    },
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct ScenarioSource {
    #[arg(long, value_enum)]
    preset: Option<CliPreset>,
    /// JSON scenario file
    #[arg(long)]
    scenario: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliPreset {
    Symmetric,
    Gamble,
    LethalProportional,
    EmergenceTiming,
    Dominant,
}

impl From<CliPreset> for Preset {
    fn from(value: CliPreset) -> Self {
        match value {
            CliPreset::Symmetric => Preset::Symmetric,
            CliPreset::Gamble => Preset::Gamble,
            CliPreset::LethalProportional => Preset::LethalProportional,
            CliPreset::EmergenceTiming => Preset::EmergenceTiming,
            CliPreset::Dominant => Preset::Dominant,
        }
    }
}

impl ScenarioSource {
    fn load(&self) -> Result<Scenario> {
        match (self.preset, &self.scenario) {
            (Some(preset), _) => Ok(Preset::from(preset).scenario()?),
            (None, Some(path)) => Scenario::from_file(path)
                .with_context(|| format!("failed loading scenario {}", path.display())),
            (None, None) => Err(anyhow!("either --preset or --scenario is required")),
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = SweepConfig::load()?;
    info!("cuevalue v{}", SWEEP_VERSION);

    match cli.command {
        Commands::Presets => {
            for preset in Preset::ALL {
                let scenario = preset.scenario()?;
                println!(
                    "{:<22} {}x{}  {}",
                    preset.name(),
                    scenario.payoff.phenotypes(),
                    scenario.environments(),
                    preset.description()
                );
            }
        }
        Commands::Estimate { source, bits } => {
            if bits {
                config.output.log_base = LogBase::Bits;
            }
            let scenario = source.load()?;
            let estimator = CueBenefitEstimator::new(config.optimizer.clone());
            let result = estimator
                .estimate(&scenario.environment, &scenario.payoff)
                .with_context(|| format!("estimation failed for {}", scenario.name))?;
            print!("{}", render_estimate(&scenario, &result, config.output.log_base));
        }
        Commands::Sweep {
            source,
            start,
            end,
            points,
            jobs,
            output,
            pretty,
            bits,
        } => {
            // CLI flags override environment configuration
            if let Some(v) = start {
                config.grid.start = v;
            }
            if let Some(v) = end {
                config.grid.end = v;
            }
            if let Some(v) = points {
                config.grid.points = v;
            }
            if jobs.is_some() {
                config.jobs = jobs;
            }
            if output.is_some() {
                config.output.path = output;
            }
            if pretty {
                config.output.pretty = true;
            }
            if bits {
                config.output.log_base = LogBase::Bits;
            }
            config.validate()?;

            let scenario = source.load()?;
            let grid = two_state_grid(&config.grid);
            info!(
                scenario = %scenario.name,
                points = grid.len(),
                jobs = ?config.jobs,
                "starting sweep"
            );

            let estimator = CueBenefitEstimator::new(config.optimizer.clone());
            let points = run_sweep(&scenario, &grid, &estimator, config.jobs)?;
            let report = SweepReport::new(&scenario, points);

            print!("{}", report.render_table(config.output.log_base));
            if let Some(path) = &config.output.path {
                report
                    .write_json(path, config.output.pretty)
                    .with_context(|| format!("failed writing {}", path.display()))?;
            }
        }
    }

    Ok(())
}
