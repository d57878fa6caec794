use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their SDK errors into this type so startup and the
/// event loop can tell fatal configuration problems from delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("configuration file '{}' not found", .path.display())]
    ConfigMissing { path: PathBuf },

    #[error("credential missing: {0}")]
    CredentialMissing(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
