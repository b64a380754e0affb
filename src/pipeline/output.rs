use csv::{Terminator, WriterBuilder};
use std::io::Write;
use tracing::warn;

use crate::constants::DEFAULT_OUTPUT_COLUMNS;
use crate::domain::MergedRecord;
use crate::error::Result;

/// Write a header row and one row per record, values in `columns` order.
///
/// Absent values become empty cells. Cells are quoted only when needed and
/// rows end in CRLF. Returns the number of data rows written.
pub fn write_csv<W: Write>(
    records: &[MergedRecord],
    columns: &[String],
    writer: W,
) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(columns)?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| record.field(c).unwrap_or("")))?;
    }

    wtr.flush()?;
    Ok(records.len())
}

/// Render the whole table in memory, so a failure never leaves a half-written row.
pub fn render_csv(records: &[MergedRecord], columns: &[String]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(records, columns, &mut buffer)?;
    Ok(buffer)
}

/// Configured columns that no record can fill: neither a known field nor a
/// column carried through from the host section.
pub fn unknown_columns<'c>(records: &[MergedRecord], columns: &'c [String]) -> Vec<&'c str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| !DEFAULT_OUTPUT_COLUMNS.contains(c))
        .filter(|c| !records.iter().any(|r| r.host.extra.contains_key(c)))
        .collect()
}

/// Log a warning for every configured column that will always be empty
pub fn warn_unknown_columns(records: &[MergedRecord], columns: &[String]) {
    for column in unknown_columns(records, columns) {
        warn!(column, "Output column matches no report field; it will be empty");
    }
}
