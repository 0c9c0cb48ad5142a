use crate::template::RecordTemplate;
use crate::traits::TextExtractor;
use crate::Result;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub struct Preprocessor;

impl Preprocessor {
    /// `<source><suffix>`, e.g. `list.pdf` becomes `list.pdf.data`.
    pub fn data_file_path(source: &Path, template: &RecordTemplate) -> PathBuf {
        let mut path = OsString::from(source.as_os_str());
        path.push(&template.data_file_suffix);
        PathBuf::from(path)
    }

    /// Extracts the page text of `source` and writes it to `data_file`.
    ///
    /// The file is flushed and closed before this returns. Returns the number
    /// of bytes written.
    pub fn extract_to_file(
        extractor: &dyn TextExtractor,
        source: &Path,
        data_file: &Path,
        start_page: usize,
    ) -> Result<usize> {
        tracing::info!(
            "Extracting text from {} starting at page index {} ({})",
            source.display(),
            start_page,
            extractor.name()
        );
        let text = extractor.extract_text(source, start_page)?;

        let mut writer = BufWriter::new(File::create(data_file)?);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        tracing::info!(
            "Wrote intermediate text: {} ({} bytes)",
            data_file.display(),
            text.len()
        );
        Ok(text.len())
    }

    pub fn remove_data_file(data_file: &Path) -> Result<()> {
        match std::fs::remove_file(data_file) {
            Ok(()) => {
                tracing::debug!("Removed intermediate file: {}", data_file.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Intermediate file already gone: {}", data_file.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
