use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, ScrapeError};
use crate::record::DetailRecord;

/// File stem for records whose name could not be extracted. Every such record
/// lands on the same file.
pub const UNNAMED_STEM: &str = "None";

/// Saves records as pretty JSON, one file per record name.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    dir: PathBuf,
}

impl RecordWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ScrapeError::io(&self.dir, e))
    }

    pub fn path_for(&self, record: &DetailRecord) -> PathBuf {
        let stem = match record.name.as_deref() {
            Some(name) => sanitize(name),
            None => UNNAMED_STEM.to_string(),
        };
        self.dir.join(format!("{}.json", stem))
    }

    /// Write `record`, replacing any file of the same name.
    pub fn write(&self, record: &DetailRecord) -> Result<PathBuf> {
        let path = self.path_for(record);
        if record.name.is_none() {
            warn!("record has no name, writing to {}", path.display());
        }
        let json = serde_json::to_string_pretty(record).map_err(|e| ScrapeError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| ScrapeError::io(&path, e))?;
        Ok(path)
    }

    #[cfg(test)]
    pub fn read(path: &Path) -> Result<DetailRecord> {
        let raw = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| ScrapeError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}
