//! Per-card timing persistence.
//!
//! The in-memory map held by [`TimerStore`] is authoritative for the
//! lifetime of the process. A [`TimerBackend`] mirrors it to durable
//! storage; backend failures are logged and never reach the caller.

use crate::error::{Result, TimerError};
use crate::input::{parse_delay_input, DelayInput, TimerEdit};
use crate::types::{CardId, CardTimingState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Timing state of every card that has one.
pub type Timers = HashMap<CardId, CardTimingState>;

/// On-disk layout: `{"timers": {"<card id>": {"timer": .., "streak": .., "wrong_counter": ..}}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TimersDocument {
    #[serde(default)]
    pub timers: Timers,
}

/// Durable mirror of the timer map.
pub trait TimerBackend: Send {
    /// Read the stored map. Missing or unreadable storage yields an empty map.
    fn load(&self) -> Timers;

    /// Overwrite the stored map. Failures are logged and swallowed.
    fn save(&self, timers: &Timers);
}

/// JSON file backend with atomic replace on save.
#[derive(Debug, Clone)]
pub struct JsonTimerFile {
    path: PathBuf,
}

impl JsonTimerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "timers.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Read the document. A missing file is an empty map, not an error.
    pub fn try_load(&self) -> Result<Timers> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Timers::new()),
            Err(e) => return Err(TimerError::io(&self.path, e)),
        };
        let document: TimersDocument = serde_json::from_str(&content)?;
        Ok(document.timers)
    }

    /// Write the whole document via temp file + rename.
    pub fn try_save(&self, timers: &Timers) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TimerError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&TimersDocument {
            timers: timers.clone(),
        })?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).map_err(|e| TimerError::io(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| TimerError::io(&temp_path, e))?;
            file.sync_all().map_err(|e| TimerError::io(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| TimerError::io(&self.path, e))?;
        Ok(())
    }
}

impl TimerBackend for JsonTimerFile {
    fn load(&self) -> Timers {
        match self.try_load() {
            Ok(timers) => {
                tracing::debug!(path = %self.path.display(), cards = timers.len(), "loaded timers");
                timers
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load timers, starting empty");
                Timers::new()
            }
        }
    }

    fn save(&self, timers: &Timers) {
        if let Err(e) = self.try_save(timers) {
            tracing::warn!(error = %e, "could not save timers, keeping them in memory");
        }
    }
}

/// Backend that keeps the last saved map in memory.
///
/// Clones share the same snapshot, so a test can hold one handle while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemorySnapshot>>,
}

#[derive(Debug, Default)]
struct MemorySnapshot {
    timers: Timers,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated as if a previous process had saved `timers`.
    pub fn with_timers(timers: Timers) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemorySnapshot { timers, saves: 0 })),
        }
    }

    /// Last saved map.
    pub fn saved(&self) -> Timers {
        self.inner
            .lock()
            .map(|s| s.timers.clone())
            .unwrap_or_default()
    }

    /// Number of saves performed so far.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|s| s.saves).unwrap_or_default()
    }
}

impl TimerBackend for MemoryBackend {
    fn load(&self) -> Timers {
        self.saved()
    }

    fn save(&self, timers: &Timers) {
        if let Ok(mut snapshot) = self.inner.lock() {
            snapshot.timers = timers.clone();
            snapshot.saves += 1;
        }
    }
}

/// In-memory timer map mirrored to a backend.
///
/// Mutations are not flushed automatically; call [`TimerStore::save`] at
/// the end of each logical operation.
pub struct TimerStore {
    backend: Box<dyn TimerBackend>,
    timers: Timers,
}

impl TimerStore {
    /// Open a store, loading whatever the backend holds.
    pub fn open(backend: impl TimerBackend + 'static) -> Self {
        let timers = backend.load();
        Self {
            backend: Box::new(backend),
            timers,
        }
    }

    /// Store backed by a JSON file.
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(JsonTimerFile::new(path))
    }

    /// Re-read the backend, replacing the in-memory map.
    pub fn load(&mut self) -> &Timers {
        self.timers = self.backend.load();
        &self.timers
    }

    /// Mirror the in-memory map to the backend.
    pub fn save(&self) {
        self.backend.save(&self.timers);
    }

    /// Stored state, or the zero-valued default.
    pub fn get(&self, card_id: &CardId) -> CardTimingState {
        self.timers.get(card_id).copied().unwrap_or_default()
    }

    /// Whether an entry exists for the card.
    pub fn contains(&self, card_id: &CardId) -> bool {
        self.timers.contains_key(card_id)
    }

    pub fn set(&mut self, card_id: CardId, state: CardTimingState) {
        self.timers.insert(card_id, state);
    }

    /// Remove a card's entry, returning what was stored.
    pub fn delete(&mut self, card_id: &CardId) -> Option<CardTimingState> {
        self.timers.remove(card_id)
    }

    /// Remove a card's entry and save, returning what was stored.
    pub fn clear(&mut self, card_id: &CardId) -> Option<CardTimingState> {
        let removed = self.delete(card_id);
        self.save();
        removed
    }

    /// Apply a user-entered delay in seconds and save.
    ///
    /// A positive delay overwrites `delay_ms` only; zero removes the entry.
    /// Invalid input leaves the store untouched.
    pub fn edit(&mut self, card_id: CardId, input: &str) -> Result<TimerEdit> {
        let edit = match parse_delay_input(input)? {
            DelayInput::Cancelled => return Ok(TimerEdit::Cancelled),
            DelayInput::Clear => TimerEdit::Cleared(self.delete(&card_id)),
            DelayInput::Set(delay_ms) => {
                let state = CardTimingState {
                    delay_ms,
                    ..self.get(&card_id)
                };
                self.set(card_id, state);
                TimerEdit::Set(state)
            }
        };
        self.save();
        Ok(edit)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
