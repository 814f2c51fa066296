//! Result of one sync request.

use crate::model::goal::GoalId;
use crate::sync::feed::FeedError;
use crate::sync::reconciler::ReconcileError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a sync request did nothing. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Health source is not connected in settings.
    Disconnected,
    /// Another sync holds the single-flight guard.
    InFlight,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::InFlight => "in_flight",
        }
    }
}

/// Sync run that ended without mutating state.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    Feed(FeedError),
    Reconcile(ReconcileError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Feed(err) => write!(f, "{err}"),
            Self::Reconcile(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Feed(err) => Some(err),
            Self::Reconcile(err) => Some(err),
        }
    }
}

/// Outcome of `request_sync`.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Readings were merged and a new snapshot committed.
    Completed {
        updated: Vec<GoalId>,
        synced_at_ms: i64,
    },
    Skipped(SkipReason),
    /// Fetch exceeded the configured timeout; nothing was applied.
    TimedOut,
    /// Fetch or merge failed; nothing was applied.
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}
