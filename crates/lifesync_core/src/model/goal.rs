//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical trackable goal record and its enumerations.
//! - Provide completion/progress helpers used by summaries and views.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `current` is finite and never negative.
//! - `target` is finite and strictly positive.
//! - Automatic provenance (`AppleHealth`/`Garmin`) requires `is_auto`.
//!   The converse does not hold: a manual override keeps `is_auto` and
//!   switches `source` to `Manual`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a goal.
///
/// Seed goals use short numeric strings.
pub type GoalId = String;

/// Life area a goal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalDomain {
    Physical,
    Mental,
    Spiritual,
    Emotional,
    Financial,
}

impl GoalDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Mental => "Mental",
            Self::Spiritual => "Spiritual",
            Self::Emotional => "Emotional",
            Self::Financial => "Financial",
        }
    }
}

/// How progress for a goal is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Binary done/not-done (`0` or `1`).
    Checkbox,
    /// Integer counter adjusted by increment/decrement.
    Count,
    /// Continuous value with a display unit.
    Metric,
}

/// Actor that last wrote the goal's `current` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalSource {
    /// Baseline automatic health source.
    #[serde(rename = "Apple Health")]
    AppleHealth,
    /// Enhanced automatic source, used when the enhanced flag is on.
    #[serde(rename = "Garmin")]
    Garmin,
    /// Manual check-in by the user.
    #[default]
    #[serde(rename = "Manual check-in")]
    Manual,
}

impl GoalSource {
    /// Display label, identical to the persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppleHealth => "Apple Health",
            Self::Garmin => "Garmin",
            Self::Manual => "Manual check-in",
        }
    }

    /// Returns whether this provenance comes from an automatic feed.
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::AppleHealth | Self::Garmin)
    }

    /// Returns the automatic provenance for the enhanced-source setting.
    pub fn automatic(enhanced: bool) -> Self {
        if enhanced {
            Self::Garmin
        } else {
            Self::AppleHealth
        }
    }
}

/// Comparison used to decide whether a goal is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionDirection {
    /// Complete when `current >= target` (steps, reps, prayers).
    #[default]
    AtLeast,
    /// Complete when `current <= target` (body weight, spending).
    AtMost,
}

/// Reconciliation rule applied to an auto-tracked goal during sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoRule {
    /// Monotonic counter: adds a random increment in `[100, 599]`.
    Counter,
    /// Continuous metric: random walk of at most `0.1`, one decimal place.
    Drift,
    /// Binary reading: `0` or `1`.
    Toggle,
}

/// Canonical goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub domain: GoalDomain,
    /// Serialized as `type` to match the persisted document layout.
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target: f64,
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// True only for goals fed by the automatic health source.
    #[serde(default)]
    pub is_auto: bool,
    /// Consecutive completed periods. Maintained outside the engine.
    #[serde(default)]
    pub streak: u32,
    /// Display position; dense `0..N-1` across the aggregate.
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub source: GoalSource,
    /// Unix epoch milliseconds of the last value change from any source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
    #[serde(default)]
    pub direction: CompletionDirection,
    /// Explicit sync rule; resolved from `kind` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_rule: Option<AutoRule>,
}

/// Validation failures for a single goal record.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalValidationError {
    BlankId,
    BlankTitle(GoalId),
    NonFinite { goal_id: GoalId, field: &'static str },
    NegativeCurrent { goal_id: GoalId, value: f64 },
    NonPositiveTarget { goal_id: GoalId, value: f64 },
    AutomaticSourceWithoutAuto { goal_id: GoalId, source: GoalSource },
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "goal id must not be blank"),
            Self::BlankTitle(id) => write!(f, "goal `{id}` title must not be blank"),
            Self::NonFinite { goal_id, field } => {
                write!(f, "goal `{goal_id}` {field} must be a finite number")
            }
            Self::NegativeCurrent { goal_id, value } => {
                write!(f, "goal `{goal_id}` current ({value}) must be >= 0")
            }
            Self::NonPositiveTarget { goal_id, value } => {
                write!(f, "goal `{goal_id}` target ({value}) must be > 0")
            }
            Self::AutomaticSourceWithoutAuto { goal_id, source } => write!(
                f,
                "goal `{goal_id}` has automatic source {source:?} but is not auto-tracked"
            ),
        }
    }
}

impl Error for GoalValidationError {}

impl Goal {
    /// Creates a manual goal with a caller-provided stable ID.
    ///
    /// # Invariants
    /// - `current` starts at `0`, `order` at `0`; callers place the goal.
    /// - `source` starts as `Manual`.
    pub fn manual(
        id: impl Into<GoalId>,
        title: impl Into<String>,
        domain: GoalDomain,
        kind: GoalType,
        target: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            domain,
            kind,
            target,
            current: 0.0,
            unit: None,
            icon: None,
            is_auto: false,
            streak: 0,
            order: 0,
            note: None,
            source: GoalSource::Manual,
            last_updated: None,
            direction: CompletionDirection::AtLeast,
            auto_rule: None,
        }
    }

    /// Validates single-record invariants.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.id.trim().is_empty() {
            return Err(GoalValidationError::BlankId);
        }
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::BlankTitle(self.id.clone()));
        }
        if !self.current.is_finite() {
            return Err(GoalValidationError::NonFinite {
                goal_id: self.id.clone(),
                field: "current",
            });
        }
        if !self.target.is_finite() {
            return Err(GoalValidationError::NonFinite {
                goal_id: self.id.clone(),
                field: "target",
            });
        }
        if self.current < 0.0 {
            return Err(GoalValidationError::NegativeCurrent {
                goal_id: self.id.clone(),
                value: self.current,
            });
        }
        if self.target <= 0.0 {
            return Err(GoalValidationError::NonPositiveTarget {
                goal_id: self.id.clone(),
                value: self.target,
            });
        }
        if self.source.is_automatic() && !self.is_auto {
            return Err(GoalValidationError::AutomaticSourceWithoutAuto {
                goal_id: self.id.clone(),
                source: self.source,
            });
        }
        Ok(())
    }

    /// Returns whether the goal has met its target in its own direction.
    pub fn is_complete(&self) -> bool {
        match self.direction {
            CompletionDirection::AtLeast => self.current >= self.target,
            CompletionDirection::AtMost => self.current <= self.target,
        }
    }

    /// Returns progress toward the target clamped to `[0, 1]`.
    ///
    /// For `AtMost` goals the ratio is inverted, so moving down toward the
    /// target increases progress.
    pub fn progress_fraction(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let ratio = match self.direction {
            CompletionDirection::AtLeast => self.current / self.target,
            CompletionDirection::AtMost if self.current > 0.0 => self.target / self.current,
            CompletionDirection::AtMost => 1.0,
        };
        ratio.clamp(0.0, 1.0)
    }

    /// Returns the sync rule for this goal.
    ///
    /// Falls back to the goal type when no explicit rule is stored:
    /// count -> counter, metric -> drift, checkbox -> toggle.
    pub fn resolved_auto_rule(&self) -> AutoRule {
        self.auto_rule.unwrap_or(match self.kind {
            GoalType::Count => AutoRule::Counter,
            GoalType::Metric => AutoRule::Drift,
            GoalType::Checkbox => AutoRule::Toggle,
        })
    }
}
