//! Health feed capability and the in-process simulated feed.
//!
//! # Responsibility
//! - Define the async contract the engine uses to fetch automatic readings.
//! - Provide the simulated feed: artificial latency plus bounded random
//!   readings per goal rule.
//!
//! # Invariants
//! - A feed returns readings only for goals present in the request.
//! - A failed fetch returns no readings; callers apply nothing.

use crate::model::goal::{Goal, GoalId};
use crate::sync::rules::{next_reading, RandomSource, StdRandom};
use async_trait::async_trait;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use std::time::Duration;

pub type FeedResult<T> = Result<T, FeedError>;

/// Snapshot of the auto-tracked goals handed to a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRequest {
    pub goals: Vec<Goal>,
    /// Enhanced source requested by settings.
    pub enhanced: bool,
}

/// Latest known value for one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReading {
    pub goal_id: GoalId,
    pub value: f64,
}

/// Feed failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    pub feed_id: String,
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl FeedError {
    pub fn new(
        feed_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            feed_id: feed_id.into(),
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.feed_id, self.code, self.message)
    }
}

impl Error for FeedError {}

/// Automatic health data source.
#[async_trait]
pub trait HealthFeed: Send + Sync {
    fn feed_id(&self) -> &str;
    async fn fetch(&self, request: FeedRequest) -> FeedResult<Vec<HealthReading>>;
}

/// Simulated device feed: waits `latency`, then derives readings from the
/// request snapshot using each goal's rule.
pub struct SimulatedHealthFeed {
    latency: Duration,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl SimulatedHealthFeed {
    pub fn new(latency: Duration, rng: Box<dyn RandomSource>) -> Self {
        Self {
            latency,
            rng: Mutex::new(rng),
        }
    }

    /// Entropy-backed feed with the given round-trip latency.
    pub fn with_latency(latency: Duration) -> Self {
        Self::new(latency, Box::new(StdRandom::from_entropy()))
    }
}

#[async_trait]
impl HealthFeed for SimulatedHealthFeed {
    fn feed_id(&self) -> &str {
        "simulated"
    }

    async fn fetch(&self, request: FeedRequest) -> FeedResult<Vec<HealthReading>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut rng = self.rng.lock().map_err(|_| {
            FeedError::new(self.feed_id(), "rng_poisoned", "random source lock poisoned", false)
        })?;
        let readings: Vec<HealthReading> = request
            .goals
            .iter()
            .map(|goal| HealthReading {
                goal_id: goal.id.clone(),
                value: next_reading(goal, &mut **rng),
            })
            .collect();

        debug!(
            "event=feed_fetch module=sync status=ok feed={} readings={} enhanced={}",
            self.feed_id(),
            readings.len(),
            request.enhanced
        );
        Ok(readings)
    }
}
