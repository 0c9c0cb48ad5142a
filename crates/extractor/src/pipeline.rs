use crate::extractors::{PdfTextExtractor, Preprocessor};
use crate::parser::{CsvEncoder, ParseOptions, ParseReport};
use crate::template::RecordTemplate;
use crate::traits::TextExtractor;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub parse: ParseOptions,
    /// Leave the intermediate text file in place after a successful run
    pub keep_data_file: bool,
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub data_file: PathBuf,
    pub data_file_kept: bool,
    pub bytes_extracted: usize,
    pub parse: ParseReport,
}

/// Converts a securities list PDF into CSV in two passes: text extraction
/// into `<input><suffix>`, then line parsing into the output file.
pub struct Converter {
    template: RecordTemplate,
    options: ConvertOptions,
    extractor: Box<dyn TextExtractor>,
}

impl Converter {
    pub fn new(template: RecordTemplate, options: ConvertOptions) -> Self {
        Self::with_extractor(template, options, Box::new(PdfTextExtractor::new()))
    }

    pub fn with_extractor(
        template: RecordTemplate,
        options: ConvertOptions,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        Self {
            template,
            options,
            extractor,
        }
    }

    pub fn template(&self) -> &RecordTemplate {
        &self.template
    }

    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let data_file = Preprocessor::data_file_path(input, &self.template);

        let bytes_extracted = Preprocessor::extract_to_file(
            self.extractor.as_ref(),
            input,
            &data_file,
            self.template.start_page,
        )?;

        let encoder = CsvEncoder::new(&self.template, self.options.parse);
        let parse = match encoder.encode_file(&data_file, output) {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    "Parsing failed; output removed, intermediate file left at {}",
                    data_file.display()
                );
                return Err(e);
            }
        };
        parse.log_summary();

        if self.options.keep_data_file {
            info!("Keeping intermediate file: {}", data_file.display());
        } else {
            Preprocessor::remove_data_file(&data_file)?;
        }

        Ok(ConversionReport {
            data_file,
            data_file_kept: self.options.keep_data_file,
            bytes_extracted,
            parse,
        })
    }
}
