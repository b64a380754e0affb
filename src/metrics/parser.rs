//! Parser Phase Metrics
//!
//! Metrics for section splitting and tabular parsing of the report.

use crate::constants::{SECTIONS, SECTION_MARKERS};
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Metrics collection for the Parser phase
pub struct ParserMetrics;

impl ParserMetrics {
    /// Record that all section markers were found
    pub fn record_sections_split(sections: usize) {
        ::metrics::counter!(phase_metric!(counter, "parser", "sections_split"))
            .increment(sections as u64);
    }

    /// Record a missing section marker
    pub fn record_missing_section(marker: &str) {
        ::metrics::counter!(
            phase_metric!(counter, "parser", "missing_sections"),
            "marker" => marker.to_string()
        )
        .increment(1);
    }

    /// Record rows parsed from one section
    pub fn record_rows_parsed(section: &str, rows: usize) {
        ::metrics::counter!(
            phase_metric!(counter, "parser", "rows_parsed"),
            "section" => section.to_string()
        )
        .increment(rows as u64);
        ::metrics::histogram!(
            phase_metric!(histogram, "parser", "rows_per_section"),
            "section" => section.to_string()
        )
        .record(rows as f64);
    }

    /// Record rows that carried fewer cells than the header
    pub fn record_ragged_rows(rows: usize) {
        if rows > 0 {
            ::metrics::counter!(phase_metric!(counter, "parser", "ragged_rows"))
                .increment(rows as u64);
        }
    }
}

impl PhaseMetrics for ParserMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "parser", "sections_split"));
        for marker in SECTION_MARKERS {
            let _ = counter!(
                phase_metric!(counter, "parser", "missing_sections"),
                "marker" => marker
            );
        }
        for section in SECTIONS {
            let _ = counter!(
                phase_metric!(counter, "parser", "rows_parsed"),
                "section" => section
            );
            let _ = histogram!(
                phase_metric!(histogram, "parser", "rows_per_section"),
                "section" => section
            );
        }
        let _ = counter!(phase_metric!(counter, "parser", "ragged_rows"));
    }

    fn phase_name() -> &'static str {
        "parser"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "parser", "sections_split"),
                metric_type: MetricType::Counter,
                help: "Total number of report sections located by their markers",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "missing_sections"),
                metric_type: MetricType::Counter,
                help: "Total number of runs aborted on a missing section marker",
                labels: vec!["marker"],
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "rows_parsed"),
                metric_type: MetricType::Counter,
                help: "Total number of data rows parsed across all sections",
                labels: vec!["section"],
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "ragged_rows"),
                metric_type: MetricType::Counter,
                help: "Total number of rows with fewer cells than headers",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "parser", "rows_per_section"),
                metric_type: MetricType::Histogram,
                help: "Number of data rows in each parsed section",
                labels: vec!["section"],
            },
        ]
    }
}
