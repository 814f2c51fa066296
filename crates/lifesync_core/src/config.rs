//! Engine configuration and environment overrides.
//!
//! # Invariants
//! - `sync_timeout` is always greater than zero.
//! - Invalid environment values fall back to defaults and never fail startup.

use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Default simulated network round-trip for the health feed.
pub const DEFAULT_SYNC_LATENCY: Duration = Duration::from_millis(1500);
/// Default upper bound for one feed fetch.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(10);

const SYNC_LATENCY_ENV: &str = "LIFESYNC_SYNC_LATENCY_MS";
const SYNC_TIMEOUT_ENV: &str = "LIFESYNC_SYNC_TIMEOUT_MS";
const DB_PATH_ENV: &str = "LIFESYNC_DB_PATH";
const DB_FILE_NAME: &str = "lifesync.sqlite3";

/// Tunables for the state container and simulated feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub sync_latency: Duration,
    pub sync_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sync_latency: DEFAULT_SYNC_LATENCY,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Reads overrides from `LIFESYNC_SYNC_LATENCY_MS` / `LIFESYNC_SYNC_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let sync_latency = read_millis(&lookup, SYNC_LATENCY_ENV)
            .unwrap_or(defaults.sync_latency);
        let sync_timeout = read_millis(&lookup, SYNC_TIMEOUT_ENV)
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(defaults.sync_timeout);
        Self {
            sync_latency,
            sync_timeout,
        }
    }
}

/// Resolves the database file path from `LIFESYNC_DB_PATH`, else the temp dir.
pub fn resolve_db_path() -> PathBuf {
    resolve_db_path_from(std::env::var(DB_PATH_ENV).ok())
}

fn resolve_db_path_from(raw: Option<String>) -> PathBuf {
    if let Some(raw) = raw {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn read_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(millis) => Some(Duration::from_millis(millis)),
        Err(err) => {
            warn!(
                "event=config_parse module=config status=fallback key={} error={}",
                key, err
            );
            None
        }
    }
}
