//! Automatic health sync: feed capability, per-goal rules, merge and guard.
//!
//! # Responsibility
//! - Fetch readings for auto-tracked goals from an injected `HealthFeed`.
//! - Merge readings into a new aggregate without touching manual goals.
//! - Refuse overlapping sync runs.

pub mod feed;
pub mod guard;
pub mod outcome;
pub mod reconciler;
pub mod rules;
