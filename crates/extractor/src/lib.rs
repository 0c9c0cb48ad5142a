pub mod error;
pub mod extractors;
pub mod parser;
pub mod pipeline;
pub mod template;
pub mod traits;

pub use error::{ExtractorError, Result};
pub use extractors::{PdfTextExtractor, Preprocessor};
pub use parser::{CsvEncoder, EndMarkerPolicy, ParseOptions, ParseReport, Record, Status};
pub use pipeline::{ConversionReport, ConvertOptions, Converter};
pub use template::{RecordTemplate, TemplateValidator, ValidationReport};
pub use traits::TextExtractor;
