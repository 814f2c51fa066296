//! Durable key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Define the minimal key-value contract the persistence gateway needs.
//! - Isolate SQLite details from gateway and service orchestration.
//!
//! # Invariants
//! - `set` replaces the whole value for a key in one statement; readers never
//!   observe a partially written value.

pub mod kv_store;

pub use kv_store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
