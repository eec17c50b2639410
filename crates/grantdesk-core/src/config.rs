//! Shared configuration paths for Grantdesk.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.grantdesk/` by default:
//!
//! ```text
//! ~/.grantdesk/
//! ├── config/       # tokens.json, .env
//! └── data/         # calls, proposals, assignments, reviews
//! ```
//!
//! # Environment Variables
//!
//! - `GRANTDESK_STATE_DIR`: Override the base state directory
//! - `GRANTDESK_DATA_DIR`: Override the data directory
//! - `GRANTDESK_CONFIG_DIR`: Override the config directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "GRANTDESK_STATE_DIR";

/// Environment variable for custom data directory.
pub const DATA_DIR_ENV: &str = "GRANTDESK_DATA_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "GRANTDESK_CONFIG_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".grantdesk";

const DATA_SUBDIR: &str = "data";
const CONFIG_SUBDIR: &str = "config";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Grantdesk state directory.
///
/// The state directory is determined by:
/// 1. `GRANTDESK_STATE_DIR` environment variable if set
/// 2. `~/.grantdesk` if home directory is available
/// 3. `.grantdesk` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the data directory holding persisted records.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(DATA_SUBDIR))
}

/// Get the config directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the default token file path.
pub fn tokens_file() -> PathBuf {
    config_dir().join("tokens.json")
}

/// Get the `.env` file path in the config directory.
pub fn env_file() -> PathBuf {
    config_dir().join(".env")
}

/// Loads environment variables from the config directory, then from a local
/// `.env`. Variables already set in the process win.
pub fn load_env() {
    let path = env_file();
    if path.exists() {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!(path = %path.display(), "Loaded env file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Ignoring env file"),
        }
    }
    let _ = dotenvy::dotenv();
}

/// Ensures a directory exists.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
