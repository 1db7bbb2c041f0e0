//! Persisted match history.
//!
//! An append-only, bounded log of completed sessions, newest first, saved as
//! pretty JSON in the user's data directory. Load and save failures degrade
//! gracefully: a corrupt or missing file yields an empty history, and a
//! failed write is reported but never blocks gameplay.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, GameResult};

/// Maximum number of records kept; older entries are silently evicted.
pub const HISTORY_CAP: usize = 10;

/// History filename inside the data directory.
const HISTORY_FILENAME: &str = "history.json";

/// One completed session, as shown on the match-history screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// When the session ended.
    pub timestamp: DateTime<Utc>,
    /// Mode description, e.g. `"1 vs 1"` or `"AI (hard)"`.
    pub mode: String,
    /// Outcome description, e.g. `"Checkmate! White wins"`.
    pub outcome: String,
    /// Number of half-moves played.
    pub move_count: usize,
}

impl HistoryRecord {
    /// Record stamped with the current time.
    pub fn new(mode: String, outcome: String, move_count: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            mode,
            outcome,
            move_count,
        }
    }
}

/// Bounded, newest-first store of completed sessions.
#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Store backed by `history.json` in the platform data directory.
    ///
    /// Falls back to the current directory when the platform directories
    /// cannot be resolved.
    pub fn open_default() -> Self {
        let path = match ProjectDirs::from("com", "quickchess", "quickchess") {
            Some(dirs) => dirs.data_dir().join(HISTORY_FILENAME),
            None => PathBuf::from(HISTORY_FILENAME),
        };
        Self::at_path(path)
    }

    /// Store backed by an explicit file path, loading whatever valid
    /// records it already holds.
    pub fn at_path(path: PathBuf) -> Self {
        let records = Self::load(&path);
        Self {
            path: Some(path),
            records,
        }
    }

    /// Store with no backing file. Used when persistence is unavailable and
    /// in tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
        }
    }

    fn load(path: &Path) -> Vec<HistoryRecord> {
        if !path.exists() {
            info!("[HISTORY] no history file at {:?}, starting empty", path);
            return Vec::new();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<HistoryRecord>>(&contents) {
                Ok(mut records) => {
                    records.truncate(HISTORY_CAP);
                    info!("[HISTORY] loaded {} records from {:?}", records.len(), path);
                    records
                }
                Err(e) => {
                    warn!(
                        "[HISTORY] failed to parse history file at {:?}: {}. Starting empty.",
                        path, e
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(
                    "[HISTORY] failed to read history file at {:?}: {}. Starting empty.",
                    path, e
                );
                Vec::new()
            }
        }
    }

    /// Append a record at the front, evict beyond [`HISTORY_CAP`], persist.
    ///
    /// The record is always retained in memory; the returned error only
    /// reports that writing it out failed.
    pub fn append(&mut self, record: HistoryRecord) -> GameResult<()> {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAP);
        self.persist()
    }

    fn persist(&self) -> GameResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| GameError::Persistence {
                    message: format!("creating {:?}: {e}", parent),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.records).map_err(|e| {
            GameError::Persistence {
                message: format!("serializing history: {e}"),
            }
        })?;
        fs::write(path, json).map_err(|e| GameError::Persistence {
            message: format!("writing {:?}: {e}", path),
        })
    }

    /// All records, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no session has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
