use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("config error: {0}")]
    Config(String),

    #[error("status error: {0}")]
    Status(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = PanelError> = std::result::Result<T, E>;
