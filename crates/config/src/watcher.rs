use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long to wait before retrying when the status directory is missing.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Signals a refresh whenever the bridge writes its status snapshot.
///
/// The snapshot's parent directory is watched rather than the file itself,
/// so the file may be created after the watcher starts and may be replaced
/// atomically (write-then-rename) by the bridge.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// use duos_config::FileWatcher;
/// let (_, mut rx) = FileWatcher::spawn("/home/user/.config/duos/status.json");
/// while rx.recv().await.is_some() {
///     println!("status changed");
/// }
/// # }
/// ```
pub struct FileWatcher {
    path: PathBuf,
}

impl FileWatcher {
    /// Start watching `path`.  The receiver yields once per burst of writes;
    /// refreshes that arrive while one is already pending are coalesced.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();

        tokio::spawn(watch_status(path.clone(), tx));

        (Self { path }, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Split a status path into the directory to watch and the file name to
/// filter on.  A bare file name is watched in the current directory.
fn watch_target(path: &Path) -> Option<(PathBuf, OsString)> {
    let name = path.file_name()?.to_os_string();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

/// Whether `event` is a write, create or rename landing on `name`.
fn touches(event: &Event, name: &OsString) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(name.as_os_str()))
}

async fn watch_status(path: PathBuf, tx: mpsc::Sender<()>) {
    let Some((dir, name)) = watch_target(&path) else {
        warn!("Status path '{}' has no file name; not watching", path.display());
        return;
    };

    let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = event_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            warn!("Cannot create filesystem watcher; status refreshes on timer only: {e}");
            return;
        }
    };

    // The bridge may not have created its directory yet.
    while let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        if tx.is_closed() {
            return;
        }
        debug!("Cannot watch '{}' yet ({e}); retrying", dir.display());
        tokio::time::sleep(RETRY_DELAY).await;
    }

    info!("Watching status file: {}", path.display());

    while let Some(event) = event_rx.recv().await {
        match event {
            Ok(event) if touches(&event, &name) => match tx.try_send(()) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                Err(mpsc::error::TrySendError::Closed(())) => break,
            },
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
