use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Cap on list results, so a screen never renders an unbounded table.
pub const DEFAULT_LIST_LIMIT: usize = 35;

/// Per-user configuration, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Location of the SQLite database.
    pub db_path: PathBuf,
    /// Maximum number of rows a listing returns.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

/// Default config location: `~/.aide.conf`.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aide.conf")
}

/// Read the configuration file. A missing or malformed file is fatal:
/// nothing can run without a database location.
pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}
