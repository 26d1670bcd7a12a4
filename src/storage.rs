use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entry::Entry;
use crate::error::StorageError;

/// Where the collection lives between runs.
pub trait Storage {
    fn load(&self) -> LoadOutcome;
    fn save(&self, entries: &[Entry]) -> Result<(), StorageError>;
}

/// Result of reading the persisted document. Every variant still yields a
/// usable collection; the distinction only matters for logging.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Entry>),
    Missing,
    Corrupt { reason: String },
}

impl LoadOutcome {
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::Loaded(entries) => entries,
            Self::Missing | Self::Corrupt { .. } => Vec::new(),
        }
    }
}

/// The whole collection as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFile {
    fn load(&self) -> LoadOutcome {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no watchlist file yet");
                return LoadOutcome::Missing;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "watchlist unreadable, starting empty");
                return LoadOutcome::Corrupt {
                    reason: err.to_string(),
                };
            }
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                debug!(path = %self.path.display(), count = entries.len(), "watchlist loaded");
                LoadOutcome::Loaded(entries)
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "watchlist corrupt, starting empty");
                LoadOutcome::Corrupt {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut body = serde_json::to_string_pretty(entries)?;
        body.push('\n');
        fs::write(&self.path, body).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = entries.len(), "watchlist saved");
        Ok(())
    }
}
