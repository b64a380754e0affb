//! Output Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct OutputMetrics;

impl OutputMetrics {
    pub fn record_rows_written(rows: usize, bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "output", "rows_written"))
            .increment(rows as u64);
        ::metrics::counter!(phase_metric!(counter, "output", "bytes_written"))
            .increment(bytes as u64);
    }

    pub fn record_conversion(duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "output", "conversions")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "output", "duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_conversion_failure() {
        ::metrics::counter!(phase_metric!(counter, "output", "conversion_failures")).increment(1);
    }
}

impl PhaseMetrics for OutputMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "output", "rows_written"));
        let _ = counter!(phase_metric!(counter, "output", "bytes_written"));
        let _ = counter!(phase_metric!(counter, "output", "conversions"));
        let _ = counter!(phase_metric!(counter, "output", "conversion_failures"));
        let _ = histogram!(phase_metric!(histogram, "output", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "output"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "output", "rows_written"),
                metric_type: MetricType::Counter,
                help: "Total number of CSV data rows written",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "output", "bytes_written"),
                metric_type: MetricType::Counter,
                help: "Total number of bytes written to output files",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "output", "conversions"),
                metric_type: MetricType::Counter,
                help: "Total number of completed conversions",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "output", "conversion_failures"),
                metric_type: MetricType::Counter,
                help: "Total number of conversions that aborted",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "output", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of a complete conversion in seconds",
                labels: vec![],
            },
        ]
    }
}
