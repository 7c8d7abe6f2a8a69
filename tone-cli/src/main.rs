//! # tone
//!
//! Command-line front end for `tone-core`. Analyzes one or more WAV files and
//! prints the fundamental frequency, nearest note and harmonic ratios of each.
//!
//! ## Architecture
//! - **Main Thread**: argument parsing, path validation and output
//! - **Worker Threads**: one `tone_core::analyze_file` call per path
//! - **Communication**: crossbeam channels; results are printed in input order

mod logging;
mod output;

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};
use tone_core::{AnalysisConfig, DEFAULT_MIN_FREQUENCY, ToneReport, analyze_file};

use logging::TerminalLogger;

#[derive(Parser)]
#[command(version, about = "Analyze a tone from a WAV file.", long_about = None)]
struct Cli {
    /// Paths to files to analyze
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Minimum fundamental frequency in Hz
    #[arg(long = "min", default_value_t = DEFAULT_MIN_FREQUENCY)]
    min_frequency: f64,

    /// Enable verbose logging
    #[arg(short)]
    verbose: bool,

    /// Print one JSON object per file
    #[arg(long)]
    json: bool,

    /// Number of files analyzed in parallel
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
}

type Job = (usize, PathBuf);
type Outcome = (usize, Result<ToneReport>);

fn main() -> Result<()> {
    let cli = Cli::parse();
    TerminalLogger::install(cli.verbose).context("Failed to install the logger")?;

    for path in &cli.paths {
        check_readable(path)?;
    }

    let config = AnalysisConfig {
        min_frequency: cli.min_frequency,
    };
    let reports = run_jobs(&cli.paths, config, cli.jobs)?;

    for report in &reports {
        let line = if cli.json {
            output::format_json(report)?
        } else {
            output::format_text(report)
        };
        println!("{line}");
    }
    Ok(())
}

fn check_readable(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("\"{}\" is not a readable file", path.display());
    }
    Ok(())
}

/// Analyzes every path on `jobs` worker threads and returns the reports in
/// the order the paths were given. The first failing path aborts the run.
fn run_jobs(paths: &[PathBuf], config: AnalysisConfig, jobs: usize) -> Result<Vec<ToneReport>> {
    let workers = jobs.clamp(1, paths.len().max(1));
    info!("Analyzing {} file(s) on {} worker(s)", paths.len(), workers);

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<Outcome>();

    for job in paths.iter().cloned().enumerate() {
        job_tx.send(job)?;
    }
    drop(job_tx);

    let handles = (0..workers)
        .map(|id| {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || worker_loop(job_rx, result_tx, config))
                .context("Failed to spawn a worker thread")
        })
        .collect::<Result<Vec<_>>>()?;
    drop(result_tx);

    let mut slots: Vec<Option<Result<ToneReport>>> = paths.iter().map(|_| None).collect();
    for (index, outcome) in result_rx {
        slots[index] = Some(outcome);
    }

    for handle in handles {
        if handle.join().is_err() {
            bail!("A worker thread panicked");
        }
    }

    slots
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| match slot {
            Some(outcome) => outcome,
            None => bail!("No result for \"{}\"", path.display()),
        })
        .collect()
}

fn worker_loop(jobs: Receiver<Job>, results: Sender<Outcome>, config: AnalysisConfig) {
    for (index, path) in jobs {
        debug!("Picked up \"{}\"", path.display());
        let outcome = analyze_file(&path, &config)
            .with_context(|| format!("Failed to analyze \"{}\"", path.display()));
        if results.send((index, outcome)).is_err() {
            break;
        }
    }
}
