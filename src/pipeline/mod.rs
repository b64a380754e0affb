//! Conversion pipeline: ingestion, processing, and output.
//!
//! A report is read whole, split into its four sections, parsed, and joined
//! before a single output byte is produced.

pub mod ingestion;
pub mod output;
pub mod processing;
pub mod summary;

pub use summary::{ConversionStats, ConversionSummary};

use chrono::Utc;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::{
    CATALOG_JOIN, HOST_VULNERABILITIES_SECTION, LINK_JOIN, PATCHES_BY_HOST_SECTION,
    PATCH_LINKS_SECTION, PATCH_LIST_SECTION,
};
use crate::domain::{
    HostPatchRecord, HostVulnerabilityRecord, MergedRecord, PatchCatalogRecord, PatchLinkRecord,
};
use crate::error::Result;
use crate::metrics::OutputMetrics;
use processing::{
    aggregate_links, left_outer_join, normalize_line_endings, parse_section, QualysPatchLayout,
    ReportLayout,
};

/// All four sections of a report as typed records, in document order
#[derive(Debug, Clone, Default)]
pub struct ParsedReport {
    pub catalog: Vec<PatchCatalogRecord>,
    pub hosts: Vec<HostPatchRecord>,
    pub host_vulnerabilities: Vec<HostVulnerabilityRecord>,
    pub links: Vec<PatchLinkRecord>,
}

/// Output of an in-memory conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub records: Vec<MergedRecord>,
    /// The rendered CSV table, header included
    pub csv: Vec<u8>,
    pub stats: ConversionStats,
}

pub struct Pipeline {
    layout: Box<dyn ReportLayout>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Box::new(QualysPatchLayout))
    }
}

impl Pipeline {
    pub fn new(layout: Box<dyn ReportLayout>) -> Self {
        Self { layout }
    }

    pub fn layout_name(&self) -> &'static str {
        self.layout.name()
    }

    /// Split the document and parse every section into typed records.
    ///
    /// Line endings are normalized to LF first, inside quoted cells too.
    #[instrument(skip_all, fields(layout = self.layout.name(), bytes = document.len()))]
    pub fn parse_report(&self, document: &str) -> Result<ParsedReport> {
        let document = normalize_line_endings(document);
        let sections = self.layout.split(&document)?;

        let report = ParsedReport {
            catalog: parse_section(PATCH_LIST_SECTION, sections.patch_list)?
                .into_iter()
                .map(PatchCatalogRecord::from_row)
                .collect(),
            hosts: parse_section(PATCHES_BY_HOST_SECTION, sections.patches_by_host)?
                .into_iter()
                .map(HostPatchRecord::from_row)
                .collect(),
            host_vulnerabilities: parse_section(
                HOST_VULNERABILITIES_SECTION,
                sections.host_vulnerabilities,
            )?
            .into_iter()
            .map(HostVulnerabilityRecord::from_row)
            .collect(),
            links: parse_section(PATCH_LINKS_SECTION, sections.patch_links)?
                .into_iter()
                .map(PatchLinkRecord::from_row)
                .collect(),
        };

        info!(
            catalog = report.catalog.len(),
            hosts = report.hosts.len(),
            host_vulnerabilities = report.host_vulnerabilities.len(),
            links = report.links.len(),
            "Parsed report sections"
        );
        Ok(report)
    }

    /// Widen every host/patch row with its links, then with its catalog entry.
    ///
    /// The output has exactly one record per host/patch row, in section order.
    pub fn merge(report: ParsedReport) -> (Vec<MergedRecord>, ConversionStats) {
        let mut stats = ConversionStats {
            catalog_records: report.catalog.len(),
            host_patch_records: report.hosts.len(),
            host_vulnerability_records: report.host_vulnerabilities.len(),
            link_records: report.links.len(),
            ..Default::default()
        };

        let aggregated = aggregate_links(report.links);
        stats.link_groups = aggregated.len();

        let mut merged: Vec<MergedRecord> =
            report.hosts.into_iter().map(MergedRecord::from).collect();
        stats.link_join = left_outer_join(LINK_JOIN, &mut merged, &aggregated);
        stats.catalog_join = left_outer_join(CATALOG_JOIN, &mut merged, &report.catalog);

        (merged, stats)
    }

    /// Convert a whole report held in memory into the flat CSV table
    pub fn convert_document(&self, document: &str, columns: &[String]) -> Result<Conversion> {
        let report = self.parse_report(document)?;
        let (records, mut stats) = Self::merge(report);

        output::warn_unknown_columns(&records, columns);
        let csv = output::render_csv(&records, columns)?;
        stats.rows_written = records.len();

        Ok(Conversion {
            records,
            csv,
            stats,
        })
    }
}

/// Read `input`, convert it, and write the table to `output`.
///
/// The output file is only created once the whole table has been rendered, so
/// a malformed report leaves no output behind.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<ConversionSummary> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let timer = Instant::now();
    info!(%run_id, "Starting conversion");

    let report = ingestion::read_report(input)?;
    let pipeline = Pipeline::default();
    let conversion = pipeline.convert_document(&report.text, &config.output.columns)?;

    fs::write(output, &conversion.csv)?;
    OutputMetrics::record_rows_written(conversion.stats.rows_written, conversion.csv.len());

    let elapsed = timer.elapsed();
    OutputMetrics::record_conversion(elapsed.as_secs_f64());

    let summary = ConversionSummary {
        run_id,
        started_at,
        duration_ms: elapsed.as_millis() as u64,
        layout: pipeline.layout_name(),
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        input_sha256: report.sha256,
        input_bytes: report.bytes,
        output_bytes: conversion.csv.len(),
        stats: conversion.stats,
    };
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_output_columns;

    const REPORT: &str = "Patch List,,,,,,,,\n\
        QID,Vendor ID,Severity,Title,Published\n\
        Q1,V1,5,OpenSSL Bug,2020-01-01\n\
        Q2,V2,3,Kernel Bug,2020-02-02\n\
        Patches by Host,,,,,,,,\n\
        IP,DNS,NetBIOS,OS,OS CPE,Patch QID,Vulnerability Count\n\
        10.0.0.1,host1,HOST1,Linux,cpe:/o:linux,Q1,2\n\
        10.0.0.2,host2,HOST2,Linux,cpe:/o:linux,Q3,1\n\
        Host Vulnerabilities Fixed by Patch,,,,,,,,\n\
        IP,QID,Patch QID\n\
        10.0.0.1,90001,Q1\n\
        Patch Links.,,,,,,,,\n\
        Patch QID,OS/SW,Link\n\
        Q1,Linux,http://a\n\
        Q1,Linux,http://b\n";

    #[test]
    fn test_merge_example_report() {
        let pipeline = Pipeline::default();
        let report = pipeline.parse_report(REPORT).unwrap();
        assert_eq!(report.catalog.len(), 2);
        assert_eq!(report.hosts.len(), 2);
        assert_eq!(report.host_vulnerabilities.len(), 1);
        assert_eq!(report.links.len(), 2);

        let (merged, stats) = Pipeline::merge(report);
        assert_eq!(merged.len(), 2);

        let first = &merged[0];
        assert_eq!(first.host.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(first.title.as_deref(), Some("OpenSSL Bug"));
        assert_eq!(first.severity.as_deref(), Some("5"));
        assert_eq!(first.vendor_id.as_deref(), Some("V1"));
        assert_eq!(first.published.as_deref(), Some("2020-01-01"));
        assert_eq!(first.link.as_deref(), Some("http://a, http://b"));
        assert_eq!(first.os_sw.as_deref(), Some("Linux"));

        let second = &merged[1];
        assert_eq!(second.host.qid.as_deref(), Some("Q3"));
        assert!(second.title.is_none());
        assert!(second.link.is_none());

        assert_eq!(stats.link_groups, 1);
        assert_eq!(stats.link_join, processing::JoinStats { matched: 1, unmatched: 1 });
        assert_eq!(stats.catalog_join, processing::JoinStats { matched: 1, unmatched: 1 });
    }

    #[test]
    fn test_convert_document_renders_one_row_per_host() {
        let conversion = Pipeline::default()
            .convert_document(REPORT, &default_output_columns())
            .unwrap();
        let text = String::from_utf8(conversion.csv).unwrap();

        assert_eq!(conversion.stats.rows_written, 2);
        assert_eq!(text.matches("\r\n").count(), 3);
        assert!(text.contains("\"http://a, http://b\""));
    }

    #[test]
    fn test_crlf_report_keeps_lf_inside_quoted_cells() {
        let doc = REPORT
            .replace("Q2,V2,3,Kernel Bug,2020-02-02", "Q1,V1,5,\"two\nlines\",2020-01-01")
            .replace('\n', "\r\n");
        let conversion = Pipeline::default()
            .convert_document(&doc, &default_output_columns())
            .unwrap();

        assert_eq!(conversion.records[0].title.as_deref(), Some("two\nlines"));
        let text = String::from_utf8(conversion.csv).unwrap();
        assert!(text.contains("\"two\nlines\""));
        assert!(!text.contains("two\r\nlines"));
    }

    #[test]
    fn test_convert_document_fails_without_links_marker() {
        let doc = REPORT.replace("Patch Links.,,,,,,,,", "");
        assert!(Pipeline::default()
            .convert_document(&doc, &default_output_columns())
            .is_err());
    }
}
