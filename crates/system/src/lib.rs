pub mod format;
pub mod host;
pub mod provider;

pub use format::{format_bytes, format_uptime};
pub use host::LocalHostProbe;
pub use provider::{JsonFileProvider, StatusProvider};

use chrono::Local;
use duos_core::{state::Alert, SharedState};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

/// Pulls status from a [`StatusProvider`] into [`SharedState`].
///
/// One gather applies the latest bridge report, refreshes local host stats
/// and stamps `updated_at`.  A failed fetch keeps the previous values and
/// raises an [`Alert`] instead.
pub struct Gatherer<P> {
    provider: P,
    probe: Option<LocalHostProbe>,
    state: SharedState,
    failing: bool,
}

impl<P: StatusProvider + 'static> Gatherer<P> {
    pub fn new(provider: P, state: SharedState) -> Self {
        Self {
            provider,
            probe: Some(LocalHostProbe::new()),
            state,
            failing: false,
        }
    }

    /// Skip local host sampling (headless tests, remote-only dashboards).
    pub fn without_host_probe(mut self) -> Self {
        self.probe = None;
        self
    }

    /// Run one gather cycle synchronously.
    pub fn gather(&mut self) {
        let host = self.probe.as_mut().map(LocalHostProbe::sample);

        match self.provider.fetch() {
            Ok(report) => {
                if self.failing {
                    info!("Status source recovered");
                    self.failing = false;
                }
                self.state.update(|s| {
                    s.apply(report);
                    s.alert = None;
                    s.updated_at = Some(Local::now());
                    if let Some(host) = host {
                        s.local_host = host;
                    }
                });
            }
            Err(e) => {
                // Only the first failure in a row is worth a warning.
                if self.failing {
                    debug!("Status fetch still failing: {e}");
                } else {
                    warn!("Status fetch failed: {e}");
                    self.failing = true;
                }
                self.state.update(|s| {
                    s.alert = Some(Alert::error("Status", e.to_string()));
                    if let Some(host) = host {
                        s.local_host = host;
                    }
                });
            }
        }
    }

    /// Spawn a background Tokio task that gathers every `interval_ms`
    /// milliseconds, and additionally whenever `refresh` fires.
    ///
    /// The task runs until the returned handle is aborted.
    pub fn spawn(mut self, interval_ms: u64, mut refresh: mpsc::Receiver<()>) -> JoinHandle<()> {
        let interval = Duration::from_millis(interval_ms);

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    Some(()) = refresh.recv() => debug!("Status refresh requested"),
                }
                self.gather();
            }
        })
    }
}
