use crate::state::AppState;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-wide view-state shared between the status gatherer (writer) and
/// the feeds and panels (readers).
///
/// Cloning is cheap; all clones refer to the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<AppState>>,
}

impl SharedState {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Run `f` against the current state.
    ///
    /// A writer that panicked mid-update leaves whatever it had written; the
    /// next successful update overwrites it, so readers carry on regardless.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Mutate the state in place.  A lock poisoned by an earlier panicking
    /// writer is recovered and un-poisoned.
    pub fn update(&self, f: impl FnOnce(&mut AppState)) {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| {
            self.inner.clear_poison();
            poisoned.into_inner()
        });
        f(&mut guard);
    }

    /// Owned copy of the current state, for rendering a whole frame.
    pub fn snapshot(&self) -> AppState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current local hash rate, `None` if not yet populated.
    pub fn local_hashrate(&self) -> Option<f64> {
        self.read(|s| s.local_hashrate)
    }

    /// Current network hash rate, `None` if not yet populated.
    pub fn network_hashrate(&self) -> Option<f64> {
        self.read(|s| s.network_hashrate)
    }
}
