//! Core domain logic for LifeSync.
//! This crate owns goal invariants, persistence and health sync reconciliation.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{resolve_db_path, EngineConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::app_data::{AppData, AppDataValidationError, WeeklyReview};
pub use model::goal::{
    AutoRule, CompletionDirection, Goal, GoalDomain, GoalId, GoalSource, GoalType,
    GoalValidationError,
};
pub use model::profile::{UnitSystem, UserProfile};
pub use model::seed::default_app_data;
pub use model::settings::{AppSettings, DarkMode, NotificationSettings, Theme};
pub use persist::{PersistenceError, PersistenceGateway};
pub use service::app_state::{AppState, GoalSummary};
pub use service::goal_service::{GoalServiceError, GoalServiceResult, ReorderError};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use sync::feed::{FeedError, HealthFeed, HealthReading, SimulatedHealthFeed};
pub use sync::outcome::{SkipReason, SyncError, SyncOutcome};
pub use sync::rules::{RandomSource, SequenceRandom, StdRandom};
