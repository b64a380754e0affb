pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{ReportError, Result};
pub use pipeline::{convert_file, ConversionSummary, Pipeline};
