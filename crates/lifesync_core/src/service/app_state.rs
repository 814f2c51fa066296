//! Application state container.
//!
//! # Responsibility
//! - Hold the current `AppData` snapshot for the process lifetime.
//! - Commit every mutation as a new immutable snapshot, then persist it.
//! - Run guarded health sync and expose derived summaries to the UI layer.
//!
//! # Invariants
//! - A committed snapshot is never mutated; readers hold `Arc<AppData>`.
//! - Every successful commit is followed by one gateway `save`; save failures
//!   are logged and the in-memory snapshot stays authoritative.
//! - At most one sync is in flight; overlapping requests are dropped.
//! - Manual mutations are not blocked by an in-flight sync. A manual value
//!   written during the fetch suspension is overwritten when readings land.
//! - No lock is held across an await point.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::model::app_data::AppData;
use crate::model::goal::{Goal, GoalDomain};
use crate::model::profile::UserProfile;
use crate::model::settings::{AppSettings, Theme};
use crate::persist::{PersistenceError, PersistenceGateway};
use crate::service::goal_service::{self, GoalServiceResult};
use crate::store::KvStore;
use crate::sync::feed::{HealthFeed, SimulatedHealthFeed};
use crate::sync::guard::SingleFlight;
use crate::sync::outcome::{SkipReason, SyncError, SyncOutcome};
use crate::sync::reconciler::{feed_request, reconcile};
use log::{debug, error, info, warn};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::watch;

/// Derived completion summary for the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalSummary {
    pub completed: usize,
    pub total: usize,
    pub syncing: bool,
}

impl GoalSummary {
    /// Header text: sync banner while syncing, else `"<c> of <n> complete"`.
    pub fn headline(&self) -> String {
        self.to_string()
    }
}

impl Display for GoalSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.syncing {
            write!(f, "Updating Health Data...")
        } else {
            write!(f, "{} of {} complete", self.completed, self.total)
        }
    }
}

/// Owner of the canonical aggregate.
pub struct AppState<S: KvStore> {
    snapshot: watch::Sender<Arc<AppData>>,
    gateway: Mutex<PersistenceGateway<S>>,
    clock: Arc<dyn Clock>,
    feed: Arc<dyn HealthFeed>,
    sync_flight: SingleFlight,
    config: EngineConfig,
}

impl<S: KvStore> AppState<S> {
    /// Loads the aggregate from `store` and wires injected capabilities.
    pub fn new(
        store: S,
        clock: Arc<dyn Clock>,
        feed: Arc<dyn HealthFeed>,
        config: EngineConfig,
    ) -> Self {
        let gateway = PersistenceGateway::new(store, Arc::clone(&clock));
        let initial = gateway.load();
        info!(
            "event=app_state_init module=service status=ok goals={} feed={}",
            initial.goals.len(),
            feed.feed_id()
        );
        let (snapshot, _) = watch::channel(Arc::new(initial));
        Self {
            snapshot,
            gateway: Mutex::new(gateway),
            clock,
            feed,
            sync_flight: SingleFlight::new(),
            config,
        }
    }

    /// Production wiring: system clock and simulated feed.
    pub fn with_defaults(store: S, config: EngineConfig) -> Self {
        let feed = Arc::new(SimulatedHealthFeed::with_latency(config.sync_latency));
        Self::new(store, Arc::new(SystemClock), feed, config)
    }

    /// Current committed snapshot.
    pub fn snapshot(&self) -> Arc<AppData> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that observes every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppData>> {
        self.snapshot.subscribe()
    }

    pub fn is_syncing(&self) -> bool {
        self.sync_flight.is_in_flight()
    }

    pub fn summary(&self) -> GoalSummary {
        let data = self.snapshot();
        GoalSummary {
            completed: data.completed_count(),
            total: data.goals.len(),
            syncing: self.is_syncing(),
        }
    }

    /// Goals grouped by domain in display order, cloned from the snapshot.
    pub fn goals_by_domain(&self) -> Vec<(GoalDomain, Vec<Goal>)> {
        self.snapshot()
            .goals_by_domain()
            .into_iter()
            .map(|(domain, goals)| (domain, goals.into_iter().cloned().collect()))
            .collect()
    }

    pub fn effective_theme(&self, system_prefers_dark: bool) -> Theme {
        self.snapshot().settings.effective_theme(system_prefers_dark)
    }

    pub fn is_onboarded(&self) -> bool {
        self.gateway().is_onboarded()
    }

    pub fn complete_onboarding(&self) -> Result<(), PersistenceError> {
        let result = self.gateway().set_onboarded(true);
        match &result {
            Ok(()) => info!("event=onboarding_complete module=service status=ok"),
            Err(err) => error!(
                "event=onboarding_complete module=service status=error error={}",
                err
            ),
        }
        result
    }

    pub fn update_progress(&self, goal_id: &str, value: f64) -> GoalServiceResult<Arc<AppData>> {
        let now_ms = self.clock.now_ms();
        self.commit("update_progress", |data| {
            goal_service::update_progress(data, goal_id, value, now_ms)
        })
    }

    pub fn increment_progress(&self, goal_id: &str) -> GoalServiceResult<Arc<AppData>> {
        let now_ms = self.clock.now_ms();
        self.commit("increment_progress", |data| {
            goal_service::increment_progress(data, goal_id, now_ms)
        })
    }

    pub fn decrement_progress(&self, goal_id: &str) -> GoalServiceResult<Arc<AppData>> {
        let now_ms = self.clock.now_ms();
        self.commit("decrement_progress", |data| {
            goal_service::decrement_progress(data, goal_id, now_ms)
        })
    }

    pub fn toggle_checkbox(&self, goal_id: &str) -> GoalServiceResult<Arc<AppData>> {
        let now_ms = self.clock.now_ms();
        self.commit("toggle_checkbox", |data| {
            goal_service::toggle_checkbox(data, goal_id, now_ms)
        })
    }

    pub fn update_note(
        &self,
        goal_id: &str,
        note: impl Into<String>,
    ) -> GoalServiceResult<Arc<AppData>> {
        let note = note.into();
        self.commit("update_note", |data| {
            goal_service::update_note(data, goal_id, note)
        })
    }

    pub fn update_details(&self, goal: Goal) -> GoalServiceResult<Arc<AppData>> {
        self.commit("update_details", |data| goal_service::update_details(data, goal))
    }

    pub fn reorder_goals<T: AsRef<str>>(&self, sequence: &[T]) -> GoalServiceResult<Arc<AppData>> {
        self.commit("reorder_goals", |data| {
            goal_service::reorder_goals(data, sequence)
        })
    }

    pub fn update_profile(&self, profile: UserProfile) -> Arc<AppData> {
        let committed: Result<Arc<AppData>, Infallible> =
            self.commit("update_profile", |data| {
                Ok(goal_service::update_profile(data, profile))
            });
        match committed {
            Ok(data) => data,
            Err(never) => match never {},
        }
    }

    pub fn update_settings(&self, settings: AppSettings) -> GoalServiceResult<Arc<AppData>> {
        self.commit("update_settings", |data| {
            goal_service::update_settings(data, settings)
        })
    }

    /// Fetches automatic readings and merges them into auto-tracked goals.
    ///
    /// # Contract
    /// - Skipped when the health source is disconnected or a sync is in flight.
    /// - On timeout or failure nothing is applied and the guard is released.
    /// - On success one snapshot is committed and persisted.
    pub async fn request_sync(&self) -> SyncOutcome {
        let started = self.snapshot();
        if !started.settings.is_health_connected {
            return self.skip(SkipReason::Disconnected);
        }
        let Some(_permit) = self.sync_flight.try_acquire() else {
            return self.skip(SkipReason::InFlight);
        };

        let started_at = Instant::now();
        let request = feed_request(&started);
        info!(
            "event=sync module=service status=start feed={} goals={}",
            self.feed.feed_id(),
            request.goals.len()
        );

        let fetched = tokio::time::timeout(self.config.sync_timeout, self.feed.fetch(request)).await;
        let readings = match fetched {
            Ok(Ok(readings)) => readings,
            Ok(Err(err)) => {
                warn!(
                    "event=sync module=service status=error error_code={} retryable={} error={}",
                    err.code, err.retryable, err
                );
                return SyncOutcome::Failed(SyncError::Feed(err));
            }
            Err(_) => {
                warn!(
                    "event=sync module=service status=timeout timeout_ms={}",
                    self.config.sync_timeout.as_millis()
                );
                return SyncOutcome::TimedOut;
            }
        };

        let now_ms = self.clock.now_ms();
        let mut updated = Vec::new();
        let committed = self.commit("sync", |data| {
            let merged = reconcile(data, &readings, now_ms)?;
            updated = merged.updated;
            Ok(merged.data)
        });

        match committed {
            Ok(_) => {
                info!(
                    "event=sync module=service status=ok updated={} duration_ms={}",
                    updated.len(),
                    started_at.elapsed().as_millis()
                );
                SyncOutcome::Completed {
                    updated,
                    synced_at_ms: now_ms,
                }
            }
            Err(err) => {
                warn!(
                    "event=sync module=service status=error error_code=reconcile_rejected error={}",
                    err
                );
                SyncOutcome::Failed(SyncError::Reconcile(err))
            }
        }
    }

    fn skip(&self, reason: SkipReason) -> SyncOutcome {
        debug!(
            "event=sync module=service status=skipped reason={}",
            reason.as_str()
        );
        SyncOutcome::Skipped(reason)
    }

    /// Applies `mutate` to the current snapshot and commits the result.
    ///
    /// The read-modify-replace runs under the watch channel's write lock, so
    /// concurrent commits serialize and none is lost.
    fn commit<E: Display>(
        &self,
        op: &'static str,
        mutate: impl FnOnce(&AppData) -> Result<AppData, E>,
    ) -> Result<Arc<AppData>, E> {
        let mut outcome = None;
        self.snapshot.send_if_modified(|current| match mutate(current.as_ref()) {
            Ok(next) => {
                let next = Arc::new(next);
                *current = Arc::clone(&next);
                outcome = Some(Ok(next));
                true
            }
            Err(err) => {
                outcome = Some(Err(err));
                false
            }
        });

        let committed = outcome.unwrap_or_else(|| Ok(self.snapshot()));
        match &committed {
            Ok(_) => {
                debug!("event=commit module=service status=ok op={op}");
                self.persist_latest(op);
            }
            Err(err) => {
                debug!("event=commit module=service status=rejected op={op} error={err}");
            }
        }
        committed
    }

    /// Saves the newest snapshot; a write failure is logged and swallowed.
    fn persist_latest(&self, op: &'static str) {
        let gateway = self.gateway();
        let latest = self.snapshot();
        if let Err(err) = gateway.save(&latest) {
            error!(
                "event=app_data_save module=service status=error op={} error={}",
                op, err
            );
        }
    }

    fn gateway(&self) -> std::sync::MutexGuard<'_, PersistenceGateway<S>> {
        self.gateway.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::GoalSummary;

    #[test]
    fn headline_switches_while_syncing() {
        let idle = GoalSummary {
            completed: 3,
            total: 9,
            syncing: false,
        };
        assert_eq!(idle.headline(), "3 of 9 complete");

        let busy = GoalSummary {
            syncing: true,
            ..idle
        };
        assert_eq!(busy.headline(), "Updating Health Data...");
    }
}
