//! duos-panel: terminal dashboard for a DUO wallet node.
//!
//! Run with:  `RUST_LOG=info duos-panel`

mod dashboard;

use anyhow::Result;
use dashboard::Dashboard;
use duos_config::{FeedConfig, FileWatcher};
use duos_core::{Panel, SharedState};
use duos_feed::{HashRate, RollingFeed, StateSource};
use duos_system::{Gatherer, JsonFileProvider};
use duos_widgets::{BalancePanel, LatestTxPanel, PeersPanel, StatusPanel, TextSparkline};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't tear the dashboard on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("duos-panel v{} starting", env!("CARGO_PKG_VERSION"));

    let config = duos_config::load(duos_config::default_path())?;
    let state = SharedState::default();

    // ── Status gatherer ───────────────────────────────────────────────────────
    let status_path = duos_config::status_file(&config);
    info!("Reading node status from {}", status_path.display());
    let (_watcher, refresh) = if config.global.watch_status_file {
        let (watcher, rx) = FileWatcher::spawn(&status_path);
        (Some(watcher), rx)
    } else {
        let (_, rx) = mpsc::channel(1);
        (None, rx)
    };
    let gatherer = Gatherer::new(JsonFileProvider::new(&status_path), state.clone())
        .spawn(config.global.gather_interval_ms, refresh);

    // ── Hash-rate sparklines ──────────────────────────────────────────────────
    let local_chart = Arc::new(TextSparkline::new("Local hashrate", config.local_feed.max_y));
    let network_chart = Arc::new(TextSparkline::new("Network hashrate", config.network_feed.max_y));

    let mut local_feed = build_feed(
        &config.local_feed,
        StateSource::new(state.clone(), HashRate::Local),
        Arc::clone(&local_chart),
    )?;
    let mut network_feed = build_feed(
        &config.network_feed,
        StateSource::new(state.clone(), HashRate::Network),
        Arc::clone(&network_chart),
    )?;
    local_feed.start();
    network_feed.start();

    // ── Repaint loop ──────────────────────────────────────────────────────────
    let panels: Vec<Box<dyn Panel>> = vec![
        Box::new(BalancePanel::new()),
        Box::new(StatusPanel::new()),
        Box::new(LatestTxPanel::new()),
        Box::new(PeersPanel::new()),
    ];
    let dashboard = Dashboard::new(vec![local_chart, network_chart], panels);
    let mut redraw = time::interval(Duration::from_millis(config.global.redraw_interval_ms));

    loop {
        tokio::select! {
            _ = redraw.tick() => dashboard.draw(&state.snapshot()),
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!("Cannot listen for Ctrl-C: {e}");
                }
                break;
            }
        }
    }

    info!("Shutting down");
    local_feed.stop();
    network_feed.stop();
    gatherer.abort();

    Ok(())
}

fn build_feed(
    cfg: &FeedConfig,
    source: StateSource,
    chart: Arc<TextSparkline>,
) -> duos_core::Result<RollingFeed> {
    RollingFeed::new(
        cfg.window_capacity()?,
        cfg.interval(),
        cfg.label_id.clone(),
        source,
        chart,
    )
}
