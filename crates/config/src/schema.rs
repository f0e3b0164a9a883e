use duos_core::{PanelError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure parsed from `duos.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Settings shared by the whole dashboard.
    pub global: GlobalConfig,
    /// Local miner hash-rate sparkline.
    pub local_feed: FeedConfig,
    /// Network hash-rate sparkline.
    pub network_feed: FeedConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            local_feed: FeedConfig::local(),
            network_feed: FeedConfig::network(),
        }
    }
}

impl PanelConfig {
    /// Reject values the feeds and gatherer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.global.gather_interval_ms == 0 {
            return Err(PanelError::Config("global.gather_interval_ms must be > 0".into()));
        }
        if self.global.redraw_interval_ms == 0 {
            return Err(PanelError::Config("global.redraw_interval_ms must be > 0".into()));
        }
        self.local_feed.validate("local_feed")?;
        self.network_feed.validate("network_feed")
    }
}

/// Global dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// How often the status gatherer re-reads the bridge snapshot.
    pub gather_interval_ms: u64,
    /// How often the terminal frame is repainted.
    pub redraw_interval_ms: u64,
    /// Bridge snapshot file.  `None` = `status.json` next to the config file.
    pub status_file: Option<PathBuf>,
    /// Refresh immediately whenever the snapshot file is written.
    pub watch_status_file: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            gather_interval_ms: 1_000,
            redraw_interval_ms: 1_000,
            status_file: None,
            watch_status_file: true,
        }
    }
}

/// Config block for one rolling hash-rate feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Number of samples kept in the window.
    pub capacity: usize,
    /// Sampling period in milliseconds.
    pub interval_ms: u64,
    /// Id of the text label that shows the current rate.
    pub label_id: String,
    /// Top of the chart's Y axis, in H/s.
    pub max_y: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl FeedConfig {
    pub fn local() -> Self {
        Self {
            capacity: 19,
            interval_ms: 500,
            label_id: "lhr".to_string(),
            max_y: 99_999.0,
        }
    }

    pub fn network() -> Self {
        Self {
            label_id: "nhr".to_string(),
            max_y: 9_999_999.0,
            ..Self::local()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Window capacity; errors if configured as zero.
    pub fn window_capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity)
            .ok_or_else(|| PanelError::Config(format!("feed '{}': capacity must be > 0", self.label_id)))
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.capacity == 0 {
            return Err(PanelError::Config(format!("{section}.capacity must be > 0")));
        }
        if self.interval_ms == 0 {
            return Err(PanelError::Config(format!("{section}.interval_ms must be > 0")));
        }
        if !(self.max_y.is_finite() && self.max_y > 0.0) {
            return Err(PanelError::Config(format!("{section}.max_y must be a positive number")));
        }
        Ok(())
    }
}
