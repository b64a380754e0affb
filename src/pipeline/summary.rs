use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::processing::JoinStats;
use crate::error::Result;

/// Record counts gathered while converting one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub catalog_records: usize,
    pub host_patch_records: usize,
    pub host_vulnerability_records: usize,
    pub link_records: usize,
    pub link_groups: usize,
    pub link_join: JoinStats,
    pub catalog_join: JoinStats,
    pub rows_written: usize,
}

/// Result of a complete file conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub layout: &'static str,
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_sha256: String,
    pub input_bytes: usize,
    pub output_bytes: usize,
    #[serde(flatten)]
    pub stats: ConversionStats,
}

impl ConversionSummary {
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            input = %self.input.display(),
            output = %self.output.display(),
            rows = self.stats.rows_written,
            catalog = self.stats.catalog_records,
            link_groups = self.stats.link_groups,
            link_misses = self.stats.link_join.unmatched,
            catalog_misses = self.stats.catalog_join.unmatched,
            duration_ms = self.duration_ms,
            "Conversion finished"
        );
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
