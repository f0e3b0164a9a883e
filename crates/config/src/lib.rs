pub mod schema;
pub mod watcher;

pub use schema::{FeedConfig, GlobalConfig, PanelConfig};
pub use watcher::FileWatcher;

use duos_core::{PanelError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PanelConfig::default()` if
/// the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PanelConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PanelConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PanelError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: PanelConfig =
        toml::from_str(&raw).map_err(|e| PanelError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Directory holding `duos.toml`, honouring `$XDG_CONFIG_HOME`.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("duos")
}

/// Return the default config path.
pub fn default_path() -> PathBuf {
    config_dir().join("duos.toml")
}

/// Resolve the bridge snapshot path: explicit setting, else next to the config.
pub fn status_file(config: &PanelConfig) -> PathBuf {
    config
        .global
        .status_file
        .clone()
        .unwrap_or_else(|| config_dir().join("status.json"))
}
