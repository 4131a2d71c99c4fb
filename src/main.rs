//! Z(Q) Gym - main binary
//!
//! Loads a TOML configuration, runs Baseline, Hazard-Only and Z(Q) against
//! the configured seed, and prints the three depths with the Z(Q) gain.
//!
//! ```text
//! zq-gym --config configs/default.toml
//! zq-gym --seed 7 --steps 2000 --sharing independent --json
//! zq-gym --trace gated_trace.json
//! ```

mod report;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use simulation::{Experiment, MetricsHook, RngSharing, Simulator, TraceHook};
use tracing::info;
use tracing_subscriber::EnvFilter;
use types::{Variant, ZqConfig};

/// Z(Q) Gym - coherence-gated entropy dissipation experiment
#[derive(Parser, Debug)]
#[command(name = "zq-gym")]
#[command(about = "Runs the Z(Q) baseline / hazard-only / coherence-gated experiment")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, env = "ZQ_CONFIG", default_value = "configs/default.toml")]
    config: PathBuf,

    /// Override simulation.seed
    #[arg(long, env = "ZQ_SEED")]
    seed: Option<u64>,

    /// Override simulation.steps
    #[arg(long, env = "ZQ_STEPS", allow_negative_numbers = true)]
    steps: Option<i64>,

    /// Generator sharing across the three runs
    #[arg(long, env = "ZQ_SHARING", value_enum, default_value_t = SharingArg::Shared)]
    sharing: SharingArg,

    /// Run independent variants one after another
    #[arg(long)]
    sequential: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print aggregate step metrics after the report
    #[arg(long)]
    metrics: bool,

    /// Write the Z(Q) run's step records as JSON
    #[arg(long, value_name = "PATH")]
    trace: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SharingArg {
    /// One generator reused by all three runs
    Shared,
    /// Each run gets its own identically seeded generator
    Independent,
}

impl From<SharingArg> for RngSharing {
    fn from(arg: SharingArg) -> Self {
        match arg {
            SharingArg::Shared => RngSharing::Shared,
            SharingArg::Independent => RngSharing::Independent,
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<ZqConfig> {
    let mut config = ZqConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(steps) = args.steps {
        config = config.with_steps(steps);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(
        config = %args.config.display(),
        seed = config.seed(),
        steps = config.step_count(),
        sharing = ?args.sharing,
        "starting experiment"
    );

    let mut experiment = Experiment::new(Simulator::new(config))
        .with_sharing(args.sharing.into())
        .with_sequential(args.sequential);

    let metrics = Arc::new(MetricsHook::new());
    if args.metrics {
        experiment.add_hook(metrics.clone());
    }
    let trace = Arc::new(TraceHook::for_variant(Variant::CoherenceGated));
    if args.trace.is_some() {
        experiment.add_hook(trace.clone());
    }

    let report = experiment.run();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_text(&report));
    }

    if args.metrics {
        println!();
        print!("{}", report::render_metrics(&metrics.snapshot()));
    }

    if let Some(path) = &args.trace {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace file {}", path.display()))?;
        let records = trace.records_for(Variant::CoherenceGated);
        serde_json::to_writer_pretty(BufWriter::new(file), &records)
            .with_context(|| format!("Failed to write trace to {}", path.display()))?;
        info!(path = %path.display(), steps = records.len(), "trace written");
    }

    Ok(())
}
