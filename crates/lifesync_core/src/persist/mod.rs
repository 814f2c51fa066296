//! Aggregate persistence over a durable key-value store.
//!
//! # Invariants
//! - The aggregate is read and written whole under one key, never partially.
//! - Load never fails: absence or corruption falls back to the seed aggregate.

pub mod gateway;

pub use gateway::{PersistenceError, PersistenceGateway, APP_DATA_KEY, ONBOARDED_KEY};
