//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const SHADOW_FILE_NAME: &str = "user.json";
pub const CREDENTIAL_FILE_NAME: &str = "cookies.txt";

/// Errors produced while building [`PortalConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// No state directory was configured and the platform has no data dir.
    #[error("no state directory available; set PORTAL_STATE_DIR")]
    MissingStateDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Backend origin, without a trailing slash.
    pub api_url: String,
    /// Directory holding the durable user shadow and the credential file.
    pub state_dir: PathBuf,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl PortalConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORTAL_API_URL`: default `http://localhost:8080`
    /// - `PORTAL_STATE_DIR`: default the platform data dir for `portal`
    /// - `PORTAL_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse or no state dir can be found.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`PortalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = normalize_api_url(lookup("PORTAL_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;
        let state_dir = match lookup("PORTAL_STATE_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir().ok_or(ConfigError::MissingStateDir)?,
        };
        let timeout = parse_timeout(lookup("PORTAL_TIMEOUT_SECS").as_deref())?;
        Ok(Self { api_url, state_dir, timeout })
    }

    /// Location of the serialized user shadow.
    #[must_use]
    pub fn shadow_path(&self) -> PathBuf {
        self.state_dir.join(SHADOW_FILE_NAME)
    }

    /// Location of the persisted session cookies.
    #[must_use]
    pub fn credential_path(&self) -> PathBuf {
        self.state_dir.join(CREDENTIAL_FILE_NAME)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("PORTAL_API_URL must be an http(s) URL, got '{raw}'")));
    }
    Ok(trimmed.to_owned())
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(_) => Err(ConfigError::Parse(format!("invalid PORTAL_TIMEOUT_SECS: {raw}"))),
    }
}

fn default_state_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "portal").map(|dirs| dirs.data_dir().to_path_buf())
}
