use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::ledger::Ledger;

/// Failure of a ledger store. Never leaves the missing-key recorder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerStoreError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home of the missing-key ledger.
pub trait LedgerStore: Send + Sync + fmt::Debug {
    /// Read the persisted ledger.
    fn load(&self) -> Result<Ledger, LedgerStoreError>;

    /// Replace the persisted ledger with `ledger`.
    fn save(&self, ledger: &Ledger) -> Result<(), LedgerStoreError>;
}

/// Ledger persisted as a pretty-printed JSON file, overwritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Ledger, LedgerStoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(Ledger::from_json_str(&json)?)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerStoreError> {
        let json = ledger.to_json_string()?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store that counts its writes.
///
/// Useful for embedding the renderer without touching the filesystem and for
/// observing flush behaviour.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Option<Ledger>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `ledger`.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(Some(ledger)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The most recently saved (or initial) ledger.
    pub fn stored(&self) -> Option<Ledger> {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Ledger, LedgerStoreError> {
        Ok(self.stored().unwrap_or_default())
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("memory store configured to fail").into());
        }
        *self.ledger.lock().unwrap_or_else(PoisonError::into_inner) = Some(ledger.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
