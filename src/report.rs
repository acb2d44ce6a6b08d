use std::io::{self, Write};

use crate::table::{Station, StationTable};

fn write_station(out: &mut impl Write, station: &Station<'_>) -> io::Result<()> {
    // names are written as raw bytes, the input is never re-validated as utf8
    out.write_all(station.name)?;
    write!(
        out,
        "={:.1}/{:.1}/{:.1}",
        station.min(),
        station.mean(),
        station.max()
    )
}

/// Writes `{first=min/mean/max, second=min/mean/max, ...}`, ordered bytewise by name.
/// No trailing newline.
pub fn write_summary(table: StationTable<'_>, out: &mut impl Write) -> io::Result<()> {
    let mut stations = table.into_sorted().into_iter();

    write!(out, "{{")?;
    if let Some(first) = stations.next() {
        write_station(out, &first)?;
        for station in stations {
            write!(out, ", ")?;
            write_station(out, &station)?;
        }
    }
    write!(out, "}}")
}

/// [write_summary] into a `String`. Names that aren't valid utf8 are replaced lossily.
pub fn render(table: StationTable<'_>) -> String {
    let mut out = Vec::with_capacity(64 * table.len() + 2);
    write_summary(table, &mut out).expect("writing to a Vec can't fail");
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
