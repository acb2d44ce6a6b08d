//! Splitting the input into line-aligned pieces for the workers.

use std::ops::Range;

/// A contiguous run of whole records borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of `data` within the whole input
    pub offset: usize,
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.data.len()
    }
}

/// Returns one past the first newline at or after `from`, or `input.len()` if there is none.
fn next_boundary(input: &[u8], from: usize) -> usize {
    match input[from..].iter().position(|b| *b == b'\n') {
        Some(num_bytes_to_next_newline) => from + num_bytes_to_next_newline + 1,
        None => input.len(),
    }
}

/// Splits `input` into at most `count` chunks of roughly equal size, in order.
///
/// Every chunk except possibly the last ends just after a newline, so no record straddles two
/// chunks. Chunks are never empty: asking for more chunks than there are records yields fewer
/// chunks, and an empty input yields none.
pub fn split(input: &[u8], count: usize) -> Vec<Chunk<'_>> {
    let count = count.max(1);
    let chunk_size = (input.len() / count).max(1);

    let mut chunks = Vec::with_capacity(count.min(input.len()));
    let mut start = 0;
    while start < input.len() {
        let end = if chunks.len() + 1 == count {
            // last chunk absorbs the remainder
            input.len()
        } else {
            // chunk_size >= 1, so the scan starts inside this chunk and it can't come out empty
            let approx_end = (start + chunk_size).min(input.len());
            next_boundary(input, approx_end - 1)
        };
        debug_assert!(
            end == input.len() || input[end - 1] == b'\n',
            "chunk end should point at the very end or one past a newline"
        );
        chunks.push(Chunk {
            offset: start,
            data: &input[start..end],
        });
        start = end;
    }
    chunks
}
