use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::ledger::Ledger;
use super::store::{JsonFileStore, LedgerStore, LedgerStoreError};
use crate::core::Settings;

/// Collects translation misses and persists them with a debounced write.
///
/// The first new miss arms a one-shot timer; misses arriving before it fires
/// only extend the ledger. When the timer fires the ledger as it is *then* is
/// written, so a burst of misses costs a single write. Save failures are
/// logged and dropped: the ledger is a diagnostic aid and must never break a
/// conversion.
///
/// The timer runs on the Tokio runtime current when the miss is recorded, or
/// else on the one current when the recorder was opened. Without a live
/// runtime, misses are kept in memory until [`flush_now`](Self::flush_now)
/// or [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct MissingKeyRecorder {
    store: Arc<dyn LedgerStore>,
    delay: Duration,
    runtime: Option<Handle>,
    state: Mutex<RecorderState>,
}

#[derive(Debug, Default)]
struct RecorderState {
    ledger: Ledger,
    /// Armed flush timer; a live `Some` is the "flush pending" flag.
    pending: Option<PendingFlush>,
    generation: u64,
}

/// A spawned timer tagged with the generation it was armed for. Only the
/// timer whose generation is still stored may clear the pending flag.
#[derive(Debug)]
struct PendingFlush {
    generation: u64,
    timer: JoinHandle<()>,
}

impl PendingFlush {
    /// A timer spawned on a runtime that has since shut down is cancelled
    /// without ever firing.
    fn is_live(&self) -> bool {
        !self.timer.is_finished()
    }
}

impl MissingKeyRecorder {
    /// Open a recorder, loading the existing ledger from `store`.
    ///
    /// A missing or unreadable ledger starts empty.
    pub fn open(store: Arc<dyn LedgerStore>, delay: Duration) -> Arc<Self> {
        let ledger = match store.load() {
            Ok(ledger) => ledger,
            Err(LedgerStoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No missing-key ledger yet, starting empty");
                Ledger::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable missing-key ledger");
                Ledger::new()
            }
        };
        Arc::new(Self {
            store,
            delay,
            runtime: Handle::try_current().ok(),
            state: Mutex::new(RecorderState {
                ledger,
                ..RecorderState::default()
            }),
        })
    }

    /// Recorder writing to the JSON file named by `settings`.
    pub fn from_settings(settings: &Settings) -> Arc<Self> {
        Self::open(
            Arc::new(JsonFileStore::new(&settings.missing_keys_path)),
            settings.flush_delay(),
        )
    }

    /// Record a miss of `key` in `locale`.
    ///
    /// Returns `false` if the pair was already known; known pairs never touch
    /// the timer.
    pub fn record(self: &Arc<Self>, locale: &str, key: &str) -> bool {
        let mut state = self.lock();
        if !state.ledger.insert(locale, key) {
            return false;
        }
        tracing::debug!(locale, key, "Recorded missing translation");
        if !state.pending.as_ref().is_some_and(PendingFlush::is_live) {
            state.generation += 1;
            let generation = state.generation;
            state.pending = self.arm_timer(generation);
        }
        true
    }

    fn arm_timer(self: &Arc<Self>, generation: u64) -> Option<PendingFlush> {
        let runtime = Handle::try_current()
            .ok()
            .or_else(|| self.runtime.clone())?;
        let recorder: Weak<Self> = Arc::downgrade(self);
        let delay = self.delay;
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(recorder) = recorder.upgrade() {
                recorder.fire(generation);
            }
        });
        Some(PendingFlush { generation, timer })
    }

    fn fire(&self, generation: u64) {
        let snapshot = {
            let mut state = self.lock();
            if state.pending.as_ref().map(|p| p.generation) != Some(generation) {
                // Superseded: cancelled by a flush while already awake.
                return;
            }
            state.pending = None;
            state.ledger.clone()
        };
        self.persist(&snapshot);
    }

    /// Cancel a pending timer and write the ledger now.
    pub fn flush_now(&self) {
        let snapshot = {
            let mut state = self.lock();
            if let Some(pending) = state.pending.take() {
                pending.timer.abort();
            }
            state.ledger.clone()
        };
        self.persist(&snapshot);
    }

    /// Stop the recorder: the last batch is written instead of being lost
    /// with a timer that never fires.
    pub fn shutdown(&self) {
        tracing::debug!("Shutting down missing-key recorder");
        self.flush_now();
    }

    fn persist(&self, ledger: &Ledger) {
        match self.store.save(ledger) {
            Ok(()) => tracing::debug!(keys = ledger.len(), "Flushed missing-key ledger"),
            Err(e) => tracing::warn!(error = %e, "Failed to persist missing-key ledger"),
        }
    }

    /// Whether a flush timer is armed.
    pub fn is_flush_pending(&self) -> bool {
        self.lock().pending.as_ref().is_some_and(PendingFlush::is_live)
    }

    /// Copy of the current ledger.
    pub fn snapshot(&self) -> Ledger {
        self.lock().ledger.clone()
    }

    /// Number of recorded (locale, key) pairs.
    pub fn len(&self) -> usize {
        self.lock().ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ledger.is_empty()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
