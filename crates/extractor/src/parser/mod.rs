pub mod classifier;
pub mod encoder;
pub mod record;
pub mod slicer;

pub use classifier::{EndMarkerPolicy, LineClassifier, LineKind};
pub use encoder::{CsvEncoder, LINE_ENDING, ParseOptions, ParseReport};
pub use record::{Record, Status};
pub use slicer::ColumnSlicer;

/// Strips ASCII control characters and spaces from both ends. Unicode
/// whitespace such as U+00A0 is content and stays.
pub(crate) fn trim_layout(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}
