// Pipeline processing: section splitting, parsing, link aggregation and joins

pub mod enrich;
pub mod links;
pub mod normalize;
pub mod sections;
pub mod tabular;

pub use enrich::{left_outer_join, JoinColumns, JoinIndex, JoinStats};
pub use links::aggregate_links;
pub use normalize::{normalize_keys, normalize_line_endings};
pub use sections::{QualysPatchLayout, RawSections, ReportLayout};
pub use tabular::parse_section;
