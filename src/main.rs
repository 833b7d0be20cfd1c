use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parbatch::io::{JobFile, JobSource, ResultFile, SyntheticJobs, DEFAULT_JOB_COUNT};
use parbatch::log::{BarLog, ConsoleLog, LogSink, SilentLog};
use parbatch::partition::default_workers;
use parbatch::Coordinator;

#[derive(Parser, Debug)]
#[command(name = "parbatch")]
#[command(about = "Integrate a batch of sinusoid jobs across a fixed pool of worker threads", long_about = None)]
struct Args {
    /// Number of worker threads (defaults to number of CPU cores, at most 8)
    #[arg(value_name = "WORKERS")]
    workers: Option<usize>,

    /// Output file, one result per line
    #[arg(short, long, value_name = "OUTPUT", default_value = "output.txt")]
    output: PathBuf,

    /// Number of synthetic jobs to generate
    #[arg(short = 'n', long = "jobs", default_value_t = DEFAULT_JOB_COUNT)]
    job_count: usize,

    /// Seed for reproducible synthetic jobs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Read jobs from a file (`A f t0 t1 N` per line) instead of generating them
    #[arg(short, long, value_name = "INPUT", conflicts_with_all = ["job_count", "seed"])]
    input: Option<PathBuf>,

    /// Disable progress messages
    #[arg(short, long)]
    quiet: bool,

    /// Show a progress bar instead of per-worker messages
    #[arg(long, conflicts_with = "quiet")]
    progress: bool,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(verbose >= 2)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Reject a bad worker count before touching any input
    let workers = args.workers.unwrap_or_else(default_workers);
    let coordinator = Coordinator::new(workers)?;

    let mut source: Box<dyn JobSource> = match &args.input {
        Some(path) => Box::new(
            JobFile::open(path).with_context(|| format!("Failed to open job file: {}", path.display()))?,
        ),
        None => Box::new(SyntheticJobs::new(args.job_count, args.seed)),
    };

    let bar = if args.progress {
        Some(Arc::new(BarLog::new()))
    } else {
        None
    };
    let log: Arc<dyn LogSink> = match &bar {
        Some(bar) => bar.clone() as Arc<dyn LogSink>,
        None if args.quiet => Arc::new(SilentLog),
        None => Arc::new(ConsoleLog::stdout()),
    };
    let coordinator = coordinator.with_log(log);

    println!("Using {} worker threads", coordinator.num_workers());

    let mut sink = ResultFile::new(&args.output);
    let summary = coordinator
        .run(source.as_mut(), &mut sink)
        .with_context(|| format!("Batch run failed (output: {})", args.output.display()))?;

    if let Some(bar) = &bar {
        bar.finish();
    }

    println!(
        "\nIntegrated {} jobs on {} workers in {:.2?}",
        summary.jobs, summary.workers, summary.elapsed
    );
    println!("Output file: {}", args.output.display());

    Ok(())
}
