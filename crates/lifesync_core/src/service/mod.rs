//! Core use-case services.
//!
//! # Responsibility
//! - `goal_service`: pure snapshot-to-snapshot goal mutations.
//! - `app_state`: the container that commits, persists and syncs.

pub mod app_state;
pub mod goal_service;
