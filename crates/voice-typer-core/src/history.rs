//! Bounded, file-backed transcript history.

use crate::{CoreError, CoreResult};

use std::{
    collections::VecDeque,
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Number of transcripts kept; older entries are dropped on append.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// One finalized transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transcript text as injected.
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl HistoryEntry {
    /// Create an entry stamped with the current wall-clock time.
    pub fn now(text: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// Append-only sink for finalized transcripts.
pub trait HistorySink: Send {
    /// Record a finalized transcript.
    fn append(&mut self, text: &str) -> CoreResult<()>;

    /// Most recent transcript, if any.
    fn last_text(&self) -> Option<String>;
}

/// JSON history file holding at most [`MAX_HISTORY_ENTRIES`] entries,
/// newest last.
pub struct HistoryLog {
    path: PathBuf,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Open the history at `path`.
    ///
    /// A missing file is an empty history. An unreadable or corrupt file is
    /// logged and treated as empty; it is replaced by the next append.
    #[instrument(skip(path))]
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = ?path, error = %e, "Discarding unreadable history");
                VecDeque::new()
            }
        };

        info!(path = ?path, entries = entries.len(), "History opened");

        Self { path, entries }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transcript has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[track_caller]
    fn read_entries(path: &Path) -> CoreResult<VecDeque<HistoryEntry>> {
        if !path.exists() {
            return Ok(VecDeque::new());
        }

        let contents = fs::read_to_string(path).map_err(|source| CoreError::HistoryIo {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if contents.trim().is_empty() {
            return Ok(VecDeque::new());
        }

        let mut entries: VecDeque<HistoryEntry> =
            serde_json::from_str(&contents).map_err(|source| CoreError::HistoryFormat {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        while entries.len() > MAX_HISTORY_ENTRIES {
            entries.pop_front();
        }

        Ok(entries)
    }

    /// Write to a temp file then rename, so a crash never leaves a torn file.
    #[track_caller]
    fn persist(&self) -> CoreResult<()> {
        let caller = Location::caller();
        let io_err = |source| CoreError::HistoryIo {
            source,
            location: ErrorLocation::from(caller),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|source| {
                CoreError::HistoryFormat {
                    source,
                    location: ErrorLocation::from(caller),
                }
            })?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(io_err)?;
        temp_file.write_all(contents.as_bytes()).map_err(io_err)?;
        temp_file.sync_all().map_err(io_err)?;
        fs::rename(&temp_path, &self.path).map_err(io_err)?;

        debug!(entries = self.entries.len(), "History saved");

        Ok(())
    }
}

impl HistorySink for HistoryLog {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn append(&mut self, text: &str) -> CoreResult<()> {
        self.entries.push_back(HistoryEntry::now(text));
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
        self.persist()
    }

    fn last_text(&self) -> Option<String> {
        self.entries.back().map(|entry| entry.text.clone())
    }
}
