//! Acquiring the input bytes. Everything downstream borrows from a [Source], so it has to outlive
//! every table and the summary.

use std::{
    fs::File,
    io::Read,
    ops::Deref,
    path::Path,
};

use memmap2::{Mmap, MmapOptions};

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Source {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Source {
    /// Maps the file at `path` read-only. An empty file is not mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| Error::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if len == 0 {
            return Ok(Source::Owned(Vec::new()));
        }

        // SAFETY: the map is read-only and lives as long as the `Source`. Truncating the file
        // underneath a running process is outside what this tool supports.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| Error::Map {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), len, "mapped input");
        Ok(Source::Mapped(mmap))
    }

    /// Reads all of standard input into memory.
    pub fn stdin() -> Result<Self> {
        let mut buf = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .map_err(Error::Stdin)?;
        tracing::debug!(len = buf.len(), "read input from stdin");
        Ok(Source::Owned(buf))
    }
}

impl Deref for Source {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Source::Mapped(mmap) => &mmap[..],
            Source::Owned(buf) => &buf[..],
        }
    }
}
