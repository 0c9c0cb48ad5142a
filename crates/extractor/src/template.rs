use crate::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Fixed-width layout of a securities list document.
///
/// The defaults describe the SEC "Official List of Section 13(f) Securities".
/// Every field can be overridden from a JSON file; fields missing from the
/// file keep their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordTemplate {
    /// Zero-based index of the first page holding data rows
    pub start_page: usize,
    /// Appended to the input file name to build the intermediate text file
    pub data_file_suffix: String,
    pub title_prefix: String,
    /// Header lines following every title line, skipped without classification
    pub title_subrows: usize,
    pub end_prefix: String,
    /// Width of the CUSIP column, in characters
    pub cusip_width: usize,
    pub option_flag: String,
    /// Status words, tested as line suffixes in this order
    pub status_flags: Vec<String>,
    pub separator: String,
}

impl RecordTemplate {
    pub fn sec_13f() -> Self {
        Self {
            start_page: 3,
            data_file_suffix: ".data".to_string(),
            title_prefix: "CUSIP".to_string(),
            title_subrows: 3,
            end_prefix: "Total Count".to_string(),
            cusip_width: 11,
            option_flag: "*".to_string(),
            status_flags: vec!["ADDED".to_string(), "DELETED".to_string()],
            separator: ",".to_string(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::info!("Loaded template: {} ({} bytes)", path.display(), content.len());
        Self::from_json_str(&content)
    }

    pub fn with_start_page(mut self, start_page: usize) -> Self {
        self.start_page = start_page;
        self
    }
}

impl Default for RecordTemplate {
    fn default() -> Self {
        Self::sec_13f()
    }
}

pub struct TemplateValidator;

impl TemplateValidator {
    pub fn validate(template: &RecordTemplate) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if template.cusip_width == 0 {
            report
                .errors
                .push("cusip_width must be greater than 0".to_string());
        }
        if template.title_prefix.is_empty() {
            report
                .errors
                .push("title_prefix cannot be empty".to_string());
        }
        if template.end_prefix.is_empty() {
            report.errors.push("end_prefix cannot be empty".to_string());
        }
        if template.separator.is_empty() {
            report.errors.push("separator cannot be empty".to_string());
        }
        if template.option_flag.is_empty() {
            report
                .errors
                .push("option_flag cannot be empty".to_string());
        }
        if template.data_file_suffix.is_empty() {
            report
                .errors
                .push("data_file_suffix cannot be empty".to_string());
        }

        if !template.title_prefix.is_empty()
            && template.end_prefix.starts_with(&template.title_prefix)
        {
            report.warnings.push(format!(
                "end_prefix '{}' starts with title_prefix '{}'; end lines will be read as titles",
                template.end_prefix, template.title_prefix
            ));
        }

        if template.status_flags.is_empty() {
            report
                .warnings
                .push("No status_flags configured; every status column will be empty".to_string());
        }

        let mut seen = HashSet::new();
        for (idx, flag) in template.status_flags.iter().enumerate() {
            if flag.is_empty() {
                report
                    .errors
                    .push(format!("status_flags[{}] cannot be empty", idx));
                continue;
            }
            if !seen.insert(flag.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate status flag: '{}'", flag));
            }
            if !template.separator.is_empty() && flag.contains(&template.separator) {
                report.warnings.push(format!(
                    "Status flag '{}' contains the separator '{}'",
                    flag, template.separator
                ));
            }
            for later in &template.status_flags[idx + 1..] {
                if later != flag && later.ends_with(flag.as_str()) {
                    report.warnings.push(format!(
                        "Status flag '{}' shadows later flag '{}'",
                        flag, later
                    ));
                }
            }
        }

        if !report.errors.is_empty() {
            Err(ExtractorError::ValidationError(format!(
                "Template validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
