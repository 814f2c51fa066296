//! Persistence gateway for the `AppData` aggregate and the onboarding flag.
//!
//! # Responsibility
//! - Encode/decode the aggregate document and validate its schema on load.
//! - Supply the seed aggregate on absence or validation failure.
//! - Report write failures to the caller without touching in-memory state.

use crate::clock::Clock;
use crate::model::app_data::AppData;
use crate::model::seed::default_app_data;
use crate::store::{KvStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Storage key holding the serialized aggregate.
pub const APP_DATA_KEY: &str = "app_data";
/// Storage key holding the onboarding completion flag (`"true"`/`"false"`).
pub const ONBOARDED_KEY: &str = "onboarded";

/// Persistence failure. Read-side variants are recovered by seed fallback.
#[derive(Debug)]
pub enum PersistenceError {
    /// No document stored under the key.
    Missing,
    Read(StoreError),
    /// Document failed to parse or failed schema validation.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    Write(StoreError),
}

impl PersistenceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Read(_) => "read_failed",
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
            Self::Write(_) => "write_failed",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no stored document under `{APP_DATA_KEY}`"),
            Self::Read(err) => write!(f, "failed to read stored document: {err}"),
            Self::Decode(err) => write!(f, "stored document is invalid: {err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Write(err) => write!(f, "failed to write document: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing => None,
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

/// Loads and saves the aggregate as one unit.
pub struct PersistenceGateway<S: KvStore> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: KvStore> PersistenceGateway<S> {
    /// `clock` stamps the seed aggregate when fallback is needed.
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored aggregate, or the seed aggregate on any failure.
    pub fn load(&self) -> AppData {
        match self.try_load() {
            Ok(data) => {
                info!(
                    "event=app_data_load module=persist status=ok goals={}",
                    data.goals.len()
                );
                data
            }
            Err(PersistenceError::Missing) => {
                info!("event=app_data_load module=persist status=seeded reason=missing");
                default_app_data(self.clock.now_ms())
            }
            Err(err) => {
                warn!(
                    "event=app_data_load module=persist status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                default_app_data(self.clock.now_ms())
            }
        }
    }

    /// Loads the stored aggregate, surfacing why it could not be used.
    pub fn try_load(&self) -> Result<AppData, PersistenceError> {
        let raw = self
            .store
            .get(APP_DATA_KEY)
            .map_err(PersistenceError::Read)?
            .ok_or(PersistenceError::Missing)?;
        serde_json::from_str::<AppData>(&raw).map_err(PersistenceError::Decode)
    }

    /// Serializes and writes the whole aggregate under one key.
    pub fn save(&self, data: &AppData) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(data).map_err(PersistenceError::Encode)?;
        self.store
            .set(APP_DATA_KEY, &encoded)
            .map_err(PersistenceError::Write)?;
        debug!(
            "event=app_data_save module=persist status=ok bytes={}",
            encoded.len()
        );
        Ok(())
    }

    /// Reads the onboarding flag; unreadable or unknown values mean `false`.
    pub fn is_onboarded(&self) -> bool {
        match self.store.get(ONBOARDED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!(
                    "event=onboarded_load module=persist status=fallback error={}",
                    err
                );
                false
            }
        }
    }

    pub fn set_onboarded(&self, onboarded: bool) -> Result<(), PersistenceError> {
        let value = if onboarded { "true" } else { "false" };
        self.store
            .set(ONBOARDED_KEY, value)
            .map_err(PersistenceError::Write)
    }
}
