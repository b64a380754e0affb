//! Phase-organized metrics for the conversion pipeline
//!
//! Each pipeline phase defines its own metrics in a dedicated submodule. Recording
//! goes through the `metrics` facade, so it is a no-op unless a recorder is
//! installed. A batch run has nothing to scrape it, so `init_metrics` installs a
//! Prometheus recorder without an HTTP listener and `write_textfile` renders the
//! snapshot to disk once the conversion is done.

pub mod enrich;
pub mod output;
pub mod parser;
pub mod registry;

pub use enrich::EnrichMetrics;
pub use output::OutputMetrics;
pub use parser::ParserMetrics;

use std::path::Path;
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register all phase metrics. Idempotent.
pub fn init_metrics() {
    INIT.call_once(|| {
        match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                if HANDLE.set(handle).is_err() {
                    warn!("METRICS: recorder handle already set");
                }
                registry::register_all_metrics();
                info!("Prometheus recorder installed");
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
            }
        }
    });
}

/// Render the current metrics snapshot in Prometheus text format to `path`.
///
/// Does nothing when `init_metrics` was never called.
pub fn write_textfile(path: &Path) -> std::io::Result<()> {
    match HANDLE.get() {
        Some(handle) => {
            std::fs::write(path, handle.render())?;
            info!("Wrote metrics snapshot to {}", path.display());
            Ok(())
        }
        None => {
            warn!("Metrics recorder not installed; skipping textfile {}", path.display());
            Ok(())
        }
    }
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase so they appear in a snapshot even at zero
    fn register_metrics();

    /// Get the phase name for prefixing metrics
    fn phase_name() -> &'static str;

    /// Get documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    #[allow(dead_code)]
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Build a metric name following the convention
/// patch_report_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("patch_report_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("patch_report_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
