use csv::ReaderBuilder;
use tracing::debug;

use super::normalize::normalize_keys;
use crate::error::Result;
use crate::metrics::ParserMetrics;
use crate::types::Row;

/// Parse one section body: a header line followed by comma-separated data rows.
///
/// Standard CSV quoting applies, so quoted cells may hold commas and newlines.
/// A row shorter than the header lacks the trailing keys; cells past the last
/// header are dropped. Blank lines are skipped.
pub fn parse_section(section: &str, text: &str) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    let mut ragged = 0usize;

    for result in reader.records() {
        let record = result?;
        if record.len() < headers.len() {
            ragged += 1;
        }
        rows.push(normalize_keys(headers.iter().zip(record.iter())));
    }

    debug!(
        section,
        headers = headers.len(),
        rows = rows.len(),
        ragged,
        "Parsed section"
    );
    ParserMetrics::record_rows_parsed(section, rows.len());
    ParserMetrics::record_ragged_rows(ragged);
    Ok(rows)
}
