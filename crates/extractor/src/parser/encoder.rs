use super::classifier::{EndMarkerPolicy, LineClassifier, LineKind};
use super::slicer::ColumnSlicer;
use super::trim_layout;
use crate::template::RecordTemplate;
use crate::{ExtractorError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub end_marker: EndMarkerPolicy,
    /// Skip short data lines with a warning instead of failing the run
    pub lenient: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub lines_read: usize,
    pub records_written: usize,
    pub blank_lines: usize,
    pub title_blocks: usize,
    pub continuation_lines: usize,
    pub end_markers: usize,
    pub ignored_after_end: usize,
    pub malformed_skipped: usize,
}

impl ParseReport {
    pub fn log_summary(&self) {
        info!(
            "Parsed {} lines: {} records, {} title blocks, {} end markers, {} blank",
            self.lines_read,
            self.records_written,
            self.title_blocks,
            self.end_markers,
            self.blank_lines
        );
        if self.malformed_skipped > 0 {
            warn!("Skipped {} malformed line(s)", self.malformed_skipped);
        }
        if self.ignored_after_end > 0 {
            debug!("Ignored {} line(s) after end marker", self.ignored_after_end);
        }
    }
}

/// Turns extracted text into CSV rows, one per data line.
pub struct CsvEncoder<'a> {
    template: &'a RecordTemplate,
    options: ParseOptions,
}

impl<'a> CsvEncoder<'a> {
    pub fn new(template: &'a RecordTemplate, options: ParseOptions) -> Self {
        Self { template, options }
    }

    pub fn encode<R: BufRead, W: Write>(&self, reader: R, writer: &mut W) -> Result<ParseReport> {
        let mut classifier = LineClassifier::new(self.template, self.options.end_marker);
        let slicer = ColumnSlicer::new(self.template);
        let mut report = ParseReport::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            report.lines_read += 1;

            match classifier.classify(&line) {
                LineKind::Blank => report.blank_lines += 1,
                LineKind::Title => {
                    debug!("Title block at line {}", line_number);
                    report.title_blocks += 1;
                }
                LineKind::TitleContinuation => report.continuation_lines += 1,
                LineKind::EndMarker => {
                    debug!("End marker at line {}: {}", line_number, trim_layout(&line));
                    report.end_markers += 1;
                }
                LineKind::AfterEnd => report.ignored_after_end += 1,
                LineKind::Data => match slicer.slice(trim_layout(&line), line_number) {
                    Ok(record) => {
                        writer.write_all(
                            record
                                .to_csv_row(&self.template.separator, &self.template.option_flag)
                                .as_bytes(),
                        )?;
                        writer.write_all(LINE_ENDING.as_bytes())?;
                        report.records_written += 1;
                    }
                    Err(ExtractorError::MalformedRecord { line, .. }) if self.options.lenient => {
                        warn!("Skipping malformed line {}: {:?}", line_number, line);
                        report.malformed_skipped += 1;
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        if classifier.pending_skip() > 0 {
            warn!(
                "Input ended {} line(s) into a title block",
                self.template.title_subrows - classifier.pending_skip()
            );
        }

        Ok(report)
    }

    /// Reads `data_file` and writes the CSV to `output`, flushing before returning.
    /// A run that fails part way removes `output` again.
    pub fn encode_file(&self, data_file: &Path, output: &Path) -> Result<ParseReport> {
        let reader = BufReader::new(File::open(data_file)?);
        let mut writer = BufWriter::new(File::create(output)?);

        let report = match self
            .encode(reader, &mut writer)
            .and_then(|report| writer.flush().map(|_| report).map_err(ExtractorError::from))
        {
            Ok(report) => report,
            Err(e) => {
                drop(writer);
                if let Err(remove_err) = std::fs::remove_file(output) {
                    warn!(
                        "Failed to remove partial output {}: {}",
                        output.display(),
                        remove_err
                    );
                }
                return Err(e);
            }
        };

        info!(
            "Wrote {} records to {}",
            report.records_written,
            output.display()
        );
        Ok(report)
    }
}
