//! CSV sink.
//!
//! Writes UTF-8 with a byte-order mark so spreadsheet tools pick the right
//! encoding. Fields are quoted as needed, so the commas inside `Job Tags`
//! stay within their cell.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{SinkError, SinkResult};
use crate::traits::sink::RecordSink;
use crate::types::record::CanonicalJobRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes records to a CSV file, replacing any previous file.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl RecordSink for CsvSink {
    fn write(&self, records: &[CanonicalJobRecord]) -> SinkResult<usize> {
        if records.is_empty() {
            warn!(path = %self.path.display(), "No jobs were scraped, nothing to write");
            return Ok(0);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = BufWriter::new(File::create(&self.path).map_err(|e| self.io_error(e))?);
        file.write_all(UTF8_BOM).map_err(|e| self.io_error(e))?;

        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), rows = records.len(), "Saved jobs");
        Ok(records.len())
    }
}
