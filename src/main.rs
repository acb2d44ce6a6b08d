use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{builder::RangedU64ValueParser, Parser};
use onebrc::{
    available_threads,
    table::{DEFAULT_CAPACITY, MAX_CAPACITY},
    Config, Source, MAX_THREADS,
};
use tracing_subscriber::EnvFilter;

/// A Rust implementation of the One Billion Row Challenge,
/// originally posed by Gunnar Morling for Java.
///
/// Prints `{name=min/mean/max, ...}` for every name in the input, sorted by name.
#[derive(Debug, Parser)]
#[command(name = "onebrc", version)]
struct Cli {
    /// File of `name;measurement` lines, or `-` for standard input
    #[arg(default_value = "measurements.txt")]
    path: PathBuf,

    /// Worker threads; defaults to the available parallelism
    #[arg(
        short,
        long,
        env = "ONEBRC_THREADS",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_THREADS as u64),
    )]
    threads: Option<usize>,

    /// Initial slot count of every hash table
    #[arg(
        long,
        env = "ONEBRC_TABLE_CAPACITY",
        default_value_t = DEFAULT_CAPACITY,
        value_parser = RangedU64ValueParser::<usize>::new().range(2..=MAX_CAPACITY as u64),
    )]
    table_capacity: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        threads: cli.threads.unwrap_or_else(available_threads),
        table_capacity: cli.table_capacity,
    };
    tracing::debug!(?config, path = %cli.path.display(), "starting");

    let source = if cli.path.as_os_str() == "-" {
        Source::stdin()?
    } else {
        Source::open(&cli.path)?
    };

    let mut buffered_stdout = BufWriter::with_capacity(2 * 1024 * 1024, std::io::stdout());
    onebrc::process(&source, &config, &mut buffered_stdout)
        .with_context(|| format!("failed to process {}", cli.path.display()))?;
    writeln!(buffered_stdout)?;
    buffered_stdout.flush()?;
    Ok(())
}
