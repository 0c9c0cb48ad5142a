pub mod layout;
pub mod pdf;
pub mod preprocessor;

pub use layout::PageTextBuilder;
pub use pdf::PdfTextExtractor;
pub use preprocessor::Preprocessor;
