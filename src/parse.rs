//! Record decoding. Assumes well-formed `name;[-]d+.d\n` records.

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET: u32 = 2166136261;
/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 16777619;

/// Result of parsing a well-formed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRow<'a> {
    pub name: &'a [u8],
    /// FNV-1a hash of `name`
    pub hash: u32,
    /// Measurement scaled by ten, e.g. `-12.3` is `-123`
    pub measurement: i32,
    /// Offset of the next record, clamped to `input.len()`
    pub next: usize,
}

/// FNV-1a over `bytes`, identical to the hash [parse_line] computes while scanning a name.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, b| (h ^ *b as u32).wrapping_mul(FNV_PRIME))
}

/// Parses the record starting at `pos` in `input`.
///
/// The name is hashed during the scan for `;`, so it is walked exactly once. The measurement is
/// accumulated as an integer and never touches floating point.
/// Malformed input is not detected: a record missing its `;` or `.` runs off the end of `input`
/// and panics.
#[inline]
pub fn parse_line(input: &[u8], mut pos: usize) -> ParsedRow<'_> {
    let start = pos;

    // "cityname;-12.1\n"
    let mut hash = FNV_OFFSET;
    let mut b = input[pos];
    while b != b';' {
        hash = (hash ^ b as u32).wrapping_mul(FNV_PRIME);
        pos += 1;
        b = input[pos];
    }
    let name = &input[start..pos];

    // skip semi
    pos += 1;

    let mut sign = 1;
    if input[pos] == b'-' {
        sign = -1;
        pos += 1;
    }

    let mut whole = 0i32;
    b = input[pos];
    while b != b'.' {
        whole = whole * 10 + (b - b'0') as i32;
        pos += 1;
        b = input[pos];
    }

    // skip dot, the single fractional digit follows
    pos += 1;
    let measurement = sign * (whole * 10 + (input[pos] - b'0') as i32);

    ParsedRow {
        name,
        hash,
        measurement,
        // fractional digit + newline
        next: (pos + 2).min(input.len()),
    }
}
