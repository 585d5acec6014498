use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use typedcsv::{read_file, ExecutionStrategy, Parallel, ReadOptions, ReadReport, Sequential};

#[derive(Parser, Debug)]
#[command(name = "typedcsv")]
#[command(about = "Parse a CSV file into typed records and time sequential vs parallel parsing")]
struct Args {
    /// CSV file; line 1 holds the field names
    file: PathBuf,

    /// Which strategies to run
    #[arg(long, value_enum, default_value_t = StrategyArg::Both)]
    strategy: StrategyArg,

    /// Worker threads for the parallel strategy (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Don't print records, only timings
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Sequential,
    Parallel,
    Both,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let level = if args.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) pick strategies ──────────────────────────────────────────
    let options = ReadOptions::default().with_threads(args.threads);
    let mut strategies: Vec<Box<dyn ExecutionStrategy>> = Vec::new();
    if matches!(args.strategy, StrategyArg::Sequential | StrategyArg::Both) {
        strategies.push(Box::new(Sequential));
    }
    if matches!(args.strategy, StrategyArg::Parallel | StrategyArg::Both) {
        let parallel = Parallel::with_options(&options)?;
        info!(threads = parallel.threads(), "parallel pool ready");
        strategies.push(Box::new(parallel));
    }

    // ─── 3) run each over the same file ──────────────────────────────
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut timings: Vec<(&'static str, Duration)> = Vec::with_capacity(strategies.len());

    for strategy in &strategies {
        writeln!(out, "================={} read", strategy.name())?;
        let report = read_file(&args.file, &**strategy)?;
        if !args.quiet {
            print_records(&mut out, &report)?;
        }
        writeln!(out)?;
        timings.push((strategy.name(), report.elapsed));
    }

    // ─── 4) report timings ───────────────────────────────────────────
    writeln!(out, "Performance measurements:")?;
    for (name, elapsed) in timings {
        writeln!(
            out,
            "{: <12} read execution time used: {} (ms)",
            name,
            elapsed.as_millis()
        )?;
    }
    out.flush()?;
    Ok(())
}

fn print_records<W: Write>(out: &mut W, report: &ReadReport) -> io::Result<()> {
    for record in &report.records {
        writeln!(out, "{}", record)?;
    }
    Ok(())
}
