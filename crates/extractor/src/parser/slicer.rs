use super::record::{Record, Status};
use super::trim_layout;
use crate::template::RecordTemplate;
use crate::{ExtractorError, Result};

/// Slices a data line into the columns of a [`Record`].
pub struct ColumnSlicer<'a> {
    template: &'a RecordTemplate,
}

impl<'a> ColumnSlicer<'a> {
    pub fn new(template: &'a RecordTemplate) -> Self {
        Self { template }
    }

    /// Slices an already trimmed data line.
    ///
    /// `line_number` is one-based and only used for error reporting.
    pub fn slice(&self, line: &str, line_number: usize) -> Result<Record> {
        let width = self.template.cusip_width;
        if line.chars().count() < width {
            return Err(ExtractorError::MalformedRecord {
                line_number,
                line: line.to_string(),
                width,
            });
        }

        let split = line
            .char_indices()
            .nth(width)
            .map_or(line.len(), |(idx, _)| idx);
        let (cusip_no, rest) = line.split_at(split);

        let mut remainder = trim_layout(rest);

        let has_option = match remainder.strip_prefix(self.template.option_flag.as_str()) {
            Some(stripped) => {
                remainder = trim_layout(stripped);
                true
            }
            None => false,
        };

        let mut status = Status::Unchanged;
        for flag in &self.template.status_flags {
            if let Some(stripped) = remainder.strip_suffix(flag.as_str()) {
                status = Status::Flagged(flag.clone());
                remainder = trim_layout(stripped);
                break;
            }
        }

        Ok(Record {
            cusip_no: cusip_no.to_string(),
            has_option,
            issuer: remainder.to_string(),
            status,
        })
    }
}
