//! Merge of automatic readings into the aggregate.
//!
//! # Invariants
//! - Goals with `is_auto == false` are never touched.
//! - Reconciliation is all-or-nothing: one invalid reading rejects the batch.
//! - Readings overwrite `current` unconditionally; a manual value written
//!   after the feed snapshot was taken is replaced.
//! - `profile.last_sync` is stamped on every successful merge.

use crate::model::app_data::AppData;
use crate::model::goal::{GoalId, GoalSource};
use crate::sync::feed::{FeedRequest, HealthReading};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected reading batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileError {
    InvalidReading { goal_id: GoalId, value: f64 },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReading { goal_id, value } => {
                write!(f, "reading {value} for goal `{goal_id}` is not a finite value >= 0")
            }
        }
    }
}

impl Error for ReconcileError {}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub data: AppData,
    /// Goal ids whose value was overwritten, in display order.
    pub updated: Vec<GoalId>,
}

/// Builds the feed request from the auto-tracked goals of a snapshot.
pub fn feed_request(data: &AppData) -> FeedRequest {
    FeedRequest {
        goals: data
            .goals
            .iter()
            .filter(|goal| goal.is_auto)
            .cloned()
            .collect(),
        enhanced: data.settings.is_garmin_enhanced,
    }
}

/// Applies readings to `data`, producing a new aggregate.
///
/// Readings for unknown goals, or goals no longer auto-tracked, are ignored.
pub fn reconcile(
    data: &AppData,
    readings: &[HealthReading],
    now_ms: i64,
) -> Result<Reconciled, ReconcileError> {
    let mut by_goal: HashMap<&str, f64> = HashMap::with_capacity(readings.len());
    for reading in readings {
        if !reading.value.is_finite() || reading.value < 0.0 {
            return Err(ReconcileError::InvalidReading {
                goal_id: reading.goal_id.clone(),
                value: reading.value,
            });
        }
        by_goal.insert(reading.goal_id.as_str(), reading.value);
    }

    let source = GoalSource::automatic(data.settings.is_garmin_enhanced);
    let mut next = data.clone();
    let mut updated = Vec::new();
    for goal in next.goals.iter_mut().filter(|goal| goal.is_auto) {
        if let Some(value) = by_goal.get(goal.id.as_str()) {
            goal.current = *value;
            goal.last_updated = Some(now_ms);
            goal.source = source;
            updated.push(goal.id.clone());
        }
    }
    next.profile.last_sync = Some(now_ms);

    Ok(Reconciled {
        data: next,
        updated,
    })
}
