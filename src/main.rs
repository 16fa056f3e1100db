use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use spikematch_io::{ExperimentName, ResultWriter, UnitId, WaveformReader};
use spikematch_waveform::{DistanceMode, WaveformDistance};

#[derive(Parser)]
#[command(name = "spikematch")]
#[command(about = "Shape/scale waveform distance for matching spike units across sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Output and distance options shared by all subcommands.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Fail on zero channels, non-positive scaling or non-finite distances
    /// instead of reporting NaN/Inf
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl OutputArgs {
    fn metric(&self) -> WaveformDistance {
        let mode = if self.strict {
            DistanceMode::Strict
        } else {
            DistanceMode::Literal
        };
        WaveformDistance::default().with_mode(mode)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compute the distance from one unit's average waveform to another's
    Compare {
        /// CSV waveform of the first unit (rescaled onto the second)
        #[arg(long)]
        first: PathBuf,

        /// CSV waveform of the second unit
        #[arg(long)]
        second: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compute distances between every ordered pair of units
    Pairwise {
        /// CSV waveforms, one file per unit (unit ID = file stem)
        #[arg(long, num_args = 1.., required = true)]
        waveforms: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct CompareOutput {
    experiment: String,
    first: String,
    second: String,
    mode: &'static str,
    d1: f64,
    d2: f64,
}

#[derive(Serialize)]
struct PairwiseOutput {
    experiment: String,
    mode: &'static str,
    n_units: usize,
    n_samples: usize,
    n_channels: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Compare {
            first,
            second,
            output,
        } => {
            let experiment_name = ExperimentName::new(output.experiment.clone())?;
            let metric = output.metric();

            let first_id = UnitId::from_path(&first)?;
            let second_id = UnitId::from_path(&second)?;
            let x = WaveformReader::new(&first)
                .read()
                .context("failed to read first waveform")?;
            let y = WaveformReader::new(&second)
                .read()
                .context("failed to read second waveform")?;

            let report = metric
                .report(&x, &y)
                .with_context(|| format!("cannot compare {first_id} with {second_id}"))?;
            info!(
                d1 = report.distance.shape(),
                d2 = report.distance.scale(),
                "comparison complete"
            );

            let writer = ResultWriter::new(&output.output_dir, experiment_name)?;
            writer.write_compare(&first_id, &second_id, metric.mode(), x.shape(), &report)?;

            let summary = CompareOutput {
                experiment: output.experiment,
                first: first_id.to_string(),
                second: second_id.to_string(),
                mode: metric.mode().as_str(),
                d1: report.distance.shape(),
                d2: report.distance.scale(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Pairwise { waveforms, output } => {
            let experiment_name = ExperimentName::new(output.experiment.clone())?;
            let metric = output.metric();

            let dataset = WaveformReader::read_many(&waveforms)
                .context("failed to read waveform files")?;
            info!(n_units = dataset.len(), "dataset loaded");

            let matrix = metric
                .pairwise(&dataset.waveforms)
                .context("pairwise comparison failed")?;

            let writer = ResultWriter::new(&output.output_dir, experiment_name)?;
            writer.write_pairwise(&dataset.unit_ids, metric.mode(), &matrix)?;

            let (n_samples, n_channels) = dataset
                .waveforms
                .first()
                .map_or((0, 0), |w| w.shape());
            let summary = PairwiseOutput {
                experiment: output.experiment,
                mode: metric.mode().as_str(),
                n_units: dataset.len(),
                n_samples,
                n_channels,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
