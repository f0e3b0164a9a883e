use duos_core::{NodeReport, PanelError, Result};
use std::path::{Path, PathBuf};

/// Where node / wallet status comes from.
///
/// The wallet daemon and its bridge live outside this process; a provider is
/// the panel's only view of them.
pub trait StatusProvider: Send {
    fn fetch(&mut self) -> Result<NodeReport>;
}

impl<F> StatusProvider for F
where
    F: FnMut() -> Result<NodeReport> + Send,
{
    fn fetch(&mut self) -> Result<NodeReport> {
        self()
    }
}

/// Reads the JSON snapshot the bridge rewrites on every poll.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusProvider for JsonFileProvider {
    fn fetch(&mut self) -> Result<NodeReport> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            PanelError::Status(format!("cannot read '{}': {e}", self.path.display()))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            PanelError::Status(format!("malformed snapshot '{}': {e}", self.path.display()))
        })
    }
}
