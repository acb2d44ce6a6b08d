use crate::{
    parse::{parse_line, ParsedRow},
    table::{Station, StationTable},
};

/// Parses every record in `chunk` and records it into a fresh table.
/// Assumes `chunk` begins at the start of a line and ends at the end of one.
pub fn aggregate_chunk(chunk: &[u8], table_capacity: usize) -> StationTable<'_> {
    let mut table = StationTable::with_capacity(table_capacity);
    let mut pos = 0;
    while pos < chunk.len() {
        let ParsedRow {
            name,
            hash,
            measurement,
            next,
        } = parse_line(chunk, pos);
        pos = next;

        match table.lookup_mut(hash, name) {
            (_, Some(station)) => station.add_measurement(measurement),
            (slot, None) => table.insert_at(slot, Station::new(name, hash, measurement)),
        }
    }
    table
}

/// Folds the partial tables into one, starting from an empty table of `table_capacity` slots.
pub fn merge<'a>(
    tables: impl IntoIterator<Item = StationTable<'a>>,
    table_capacity: usize,
) -> StationTable<'a> {
    tables.into_iter().fold(
        StationTable::with_capacity(table_capacity),
        |mut totals, table| {
            totals.combine(table);
            totals
        },
    )
}
