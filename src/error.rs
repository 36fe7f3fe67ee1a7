use std::path::PathBuf;

/// Error taxonomy shared by the store, the date resolver, and startup.
///
/// `Format` and `NotFound` are recoverable from the dashboard's point of
/// view: a screen shows them on the message line and carries on. Everything
/// else is fatal and unwinds the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User-supplied text failed pattern validation.
    #[error("wrong {what} format: {input:?} (expected {expected})")]
    Format {
        what: &'static str,
        input: String,
        expected: &'static str,
    },
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    /// The configuration file could not be read at startup.
    #[error("cannot read configuration at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON (or misses required keys).
    #[error("cannot parse configuration at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Underlying persistence failure. No recovery strategy is defined, so
    /// this propagates and terminates the process.
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a screen may surface this inline instead of tearing the
    /// dashboard down.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Format { .. } | Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
