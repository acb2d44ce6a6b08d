//! Collects min, mean and max per name from `name;measurement` lines,
//! a Rust take on the One Billion Row Challenge.
//!
//! The input is split into line-aligned chunks, each chunk is aggregated on its own thread into a
//! private [StationTable], and the partial tables are merged once every thread has finished.
//! Names are never copied: every table borrows them from the input, which must outlive the run.

pub mod chunk;
pub mod error;
pub mod parse;
pub mod report;
pub mod source;
pub mod table;
pub mod worker;

use std::{io::Write, thread, time::Instant};

pub use error::{Error, Result};
pub use source::Source;
pub use table::{Station, StationTable};

/// Most worker threads a run will start, whatever [Config::threads] asks for
pub const MAX_THREADS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of chunks, and so of worker threads. Clamped to `1..=MAX_THREADS`
    pub threads: usize,
    /// Initial slot count of every table, rounded up to a power of two
    pub table_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: available_threads(),
            table_capacity: table::DEFAULT_CAPACITY,
        }
    }
}

/// The host's available parallelism, or 1 if it can't be queried.
pub fn available_threads() -> usize {
    match thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(e) => {
            tracing::warn!(error = %e, "couldn't query the available parallelism, going single-threaded");
            1
        }
    }
}

/// Aggregates every record in `input` using up to `config.threads` threads.
/// Returns `Err` if a worker panicked, which happens on some malformed inputs.
pub fn aggregate<'a>(input: &'a [u8], config: &Config) -> Result<StationTable<'a>> {
    let started = Instant::now();
    let chunks = chunk::split(input, config.threads.clamp(1, MAX_THREADS));
    tracing::debug!(
        chunks = chunks.len(),
        len = input.len(),
        elapsed = ?started.elapsed(),
        "split input"
    );

    let capacity = config.table_capacity;
    let partials = thread::scope(|s| {
        let handles = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                let chunk = *chunk;
                // a chunk holds fewer names than bytes, so small chunks get small tables
                let capacity = capacity.min(2 * chunk.len());
                s.spawn(move || {
                    let table = worker::aggregate_chunk(chunk.data, capacity);
                    tracing::debug!(
                        index,
                        offset = chunk.offset,
                        len = chunk.len(),
                        unique = table.len(),
                        "chunk done"
                    );
                    table
                })
            })
            .collect::<Vec<_>>();

        // join every handle, even after a failure, so the scope never re-panics
        let mut partials = Vec::with_capacity(handles.len());
        let mut failed = None;
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(table) => partials.push(table),
                Err(_) => {
                    failed.get_or_insert(index);
                }
            }
        }
        match failed {
            Some(chunk) => Err(Error::Worker { chunk }),
            None => Ok(partials),
        }
    })?; // scope ends, all threads were joined

    let merge_started = Instant::now();
    let unique_bound = partials.iter().map(StationTable::len).sum::<usize>();
    let totals = worker::merge(partials, capacity.min(2 * unique_bound));
    tracing::debug!(
        unique = totals.len(),
        merge = ?merge_started.elapsed(),
        total = ?started.elapsed(),
        "merged partial tables"
    );
    Ok(totals)
}

/// Aggregates `input` and writes the summary to `out`.
/// Nothing is written unless every chunk was processed successfully.
pub fn process(input: &[u8], config: &Config, out: &mut impl Write) -> Result<()> {
    let totals = aggregate(input, config)?;
    report::write_summary(totals, out)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::BufWriter;

    use crate::{process, Config, Error};

    fn run(input: &str, threads: usize) -> String {
        let config = Config {
            threads,
            table_capacity: 4,
        };
        let mut out = Vec::<u8>::with_capacity(1024);
        let mut buf_out = BufWriter::with_capacity(1024, &mut out);
        let processed = process(input.as_bytes(), &config, &mut buf_out);
        assert!(
            processed.is_ok(),
            "shouldn't encounter error, was given valid input: `{input}`"
        );
        drop(buf_out);
        match String::from_utf8(out) {
            Ok(s) => s,
            Err(e) => panic!("produced non-UTF8 output, `{e}`, from input `{input}`"),
        }
    }

    #[test]
    fn process_any_thread_count() {
        for threads in [1, 2, 3, 4, 16] {
            for (input, exp_out) in [
                ("", "{}"),
                ("A;1.0\nA;2.0\nB;-1.5\n", "{A=1.0/1.5/2.0, B=-1.5/-1.5/-1.5}"),
                ("A;1.0\nA;2.0\nB;-1.5", "{A=1.0/1.5/2.0, B=-1.5/-1.5/-1.5}"),
                (
                    "Hamburg;12.0\nBulawayo;8.9\nPalembang;38.8\nHamburg;34.2\nSt. John's;15.2\nCracow;12.6\nPalembang;-3.0\n",
                    "{Bulawayo=8.9/8.9/8.9, Cracow=12.6/12.6/12.6, Hamburg=12.0/23.1/34.2, Palembang=-3.0/17.9/38.8, St. John's=15.2/15.2/15.2}",
                ),
            ] {
                assert_eq!(
                    exp_out,
                    run(input, threads),
                    "bad output for input: `{input}` on {threads} threads"
                );
            }
        }
    }

    #[test]
    fn zero_threads_runs_single_threaded() {
        assert_eq!("{a=1.0/1.0/1.0}", run("a;1.0\n", 0));
    }

    #[test]
    fn oversized_config_is_clamped() {
        for (threads, table_capacity) in [
            (usize::MAX, 4),
            (1, usize::MAX),
            (usize::MAX, usize::MAX),
            (crate::MAX_THREADS + 1, crate::table::MAX_CAPACITY + 1),
        ] {
            let config = Config {
                threads,
                table_capacity,
            };
            let mut out = Vec::new();
            let processed = process(b"a;1.0\nb;2.0\na;3.0\n", &config, &mut out);
            assert!(
                processed.is_ok(),
                "threads {threads}, table_capacity {table_capacity}: {processed:?}"
            );
            assert_eq!(
                "{a=1.0/2.0/3.0, b=2.0/2.0/2.0}",
                String::from_utf8_lossy(&out),
                "threads {threads}, table_capacity {table_capacity}"
            );
        }
    }

    #[test]
    fn malformed_input_fails_without_output() {
        let config = Config {
            threads: 2,
            table_capacity: 4,
        };
        let mut out = Vec::new();
        // the second chunk has no `;` and runs the parser off its end
        let input = b"a;1.0\nb;2.0\nc;3.0\nmissing-delimiter\n";
        match process(input, &config, &mut out) {
            Err(Error::Worker { chunk }) => assert_eq!(1, chunk),
            other => panic!("expected a worker failure, got {other:?}"),
        }
        assert!(out.is_empty(), "partial output written on failure");
    }
}
