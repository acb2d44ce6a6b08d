use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can stop a run. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error opening file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("error getting file stats for {}: {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("error mapping file {}: {source}", .path.display())]
    Map { path: PathBuf, source: io::Error },

    #[error("error reading standard input: {0}")]
    Stdin(#[source] io::Error),

    /// The worker for this chunk panicked. Config values are clamped before they reach a
    /// worker, so this means a malformed record.
    #[error("worker for chunk {chunk} panicked, input is probably malformed")]
    Worker { chunk: usize },

    #[error("error writing summary: {0}")]
    Output(#[from] io::Error),
}
