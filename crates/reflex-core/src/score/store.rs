use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Durable best-score slot.
///
/// `read_best` returns the last written value, or `0` before the first write.
/// Once `write_best` returns `Ok`, the value survives a power cycle.
pub trait BestScoreStore {
    fn read_best(&self) -> Result<u16>;

    fn write_best(&mut self, value: u16) -> Result<()>;
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn read_best(&self) -> Result<u16> {
        (**self).read_best()
    }

    fn write_best(&mut self, value: u16) -> Result<()> {
        (**self).write_best(value)
    }
}

/// On-disk record of the best score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best: u16,
    pub updated_at: DateTime<Utc>,
}

/// Best score kept in a small JSON file.
///
/// Writes go to a sibling temp file which is synced and then renamed over
/// the target, so a reader never sees a partial record.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record, or `None` if nothing has been written yet.
    pub fn load_record(&self) -> Result<Option<BestScoreRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&content).map_err(|e| Error::CorruptRecord {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BestScoreStore for FileStore {
    fn read_best(&self) -> Result<u16> {
        Ok(self.load_record()?.map_or(0, |record| record.best))
    }

    fn write_best(&mut self, value: u16) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let record = BestScoreRecord {
            best: value,
            updated_at: Utc::now(),
        };
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(serde_json::to_string_pretty(&record)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!("Wrote best score {} to {:?}", value, self.path);
        Ok(())
    }
}

/// In-memory store for tests and dry runs. Counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u16,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u16) -> Self {
        Self {
            best,
            ..Self::default()
        }
    }

    /// Make every subsequent write fail.
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn read_best(&self) -> Result<u16> {
        Ok(self.best)
    }

    fn write_best(&mut self, value: u16) -> Result<()> {
        if self.fail_writes {
            return Err(Error::StoreUnavailable("write rejected".to_string()));
        }
        self.best = value;
        self.writes += 1;
        Ok(())
    }
}
