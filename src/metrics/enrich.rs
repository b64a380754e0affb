//! Enrich Phase Metrics
//!
//! Link aggregation and left-outer-join match rates.

use crate::constants::JOINS;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Metrics collection for the Enrich phase
pub struct EnrichMetrics;

impl EnrichMetrics {
    /// Record how many raw link rows collapsed into how many QID groups
    pub fn record_links_aggregated(raw_rows: usize, groups: usize) {
        ::metrics::counter!(phase_metric!(counter, "enrich", "link_rows"))
            .increment(raw_rows as u64);
        ::metrics::counter!(phase_metric!(counter, "enrich", "link_groups"))
            .increment(groups as u64);
    }

    /// Record the outcome of one left outer join
    pub fn record_join(join: &str, matched: usize, unmatched: usize) {
        ::metrics::counter!(
            phase_metric!(counter, "enrich", "join_matches"),
            "join" => join.to_string()
        )
        .increment(matched as u64);
        ::metrics::counter!(
            phase_metric!(counter, "enrich", "join_misses"),
            "join" => join.to_string()
        )
        .increment(unmatched as u64);
    }

    /// Record secondary records shadowed by a later record with the same key
    pub fn record_duplicate_keys(duplicates: usize) {
        if duplicates > 0 {
            ::metrics::counter!(phase_metric!(counter, "enrich", "duplicate_keys"))
                .increment(duplicates as u64);
        }
    }
}

impl PhaseMetrics for EnrichMetrics {
    fn register_metrics() {
        use metrics::counter;

        let _ = counter!(phase_metric!(counter, "enrich", "link_rows"));
        let _ = counter!(phase_metric!(counter, "enrich", "link_groups"));
        for join in JOINS {
            let _ = counter!(
                phase_metric!(counter, "enrich", "join_matches"),
                "join" => join
            );
            let _ = counter!(
                phase_metric!(counter, "enrich", "join_misses"),
                "join" => join
            );
        }
        let _ = counter!(phase_metric!(counter, "enrich", "duplicate_keys"));
    }

    fn phase_name() -> &'static str {
        "enrich"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "enrich", "link_rows"),
                metric_type: MetricType::Counter,
                help: "Total number of raw patch link rows aggregated",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "link_groups"),
                metric_type: MetricType::Counter,
                help: "Total number of per-QID link groups produced",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "join_matches"),
                metric_type: MetricType::Counter,
                help: "Total number of base records that found a join partner",
                labels: vec!["join"],
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "join_misses"),
                metric_type: MetricType::Counter,
                help: "Total number of base records left unmatched by a join",
                labels: vec!["join"],
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "duplicate_keys"),
                metric_type: MetricType::Counter,
                help: "Total number of secondary records overwritten by a later record with the same key",
                labels: vec![],
            },
        ]
    }
}
