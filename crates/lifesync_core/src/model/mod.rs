//! Domain model for goals and the persisted aggregate.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Hold invariant checks; no I/O and no clock reads.
//!
//! # Invariants
//! - Every goal is identified by a stable `GoalId`.
//! - Goals are never deleted by the engine.

pub mod app_data;
pub mod goal;
pub mod profile;
pub mod seed;
pub mod settings;
