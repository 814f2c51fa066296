//! Aggregate root persisted as one document.
//!
//! # Responsibility
//! - Own goals, profile, reviews and settings as a single unit.
//! - Validate the document schema on decode.
//!
//! # Invariants
//! - Goal ids are unique and non-blank.
//! - `goals[i].order == i` for every index: the vector is kept in display
//!   order and `order` values form a dense permutation of `0..N-1`.
//! - Decoding normalizes goal vector order by `order` before validating, so
//!   documents written in any array order load in display order.

use crate::model::goal::{Goal, GoalDomain, GoalValidationError};
use crate::model::profile::UserProfile;
use crate::model::settings::{AppSettings, SettingsValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Completed weekly reflection. Append-only; not mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReview {
    pub id: String,
    pub date: String,
    pub reflection: String,
    pub highlight: String,
    pub completed_at: String,
}

/// Aggregate application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AppDataDocument")]
pub struct AppData {
    pub goals: Vec<Goal>,
    pub profile: UserProfile,
    pub reviews: Vec<WeeklyReview>,
    pub settings: AppSettings,
}

/// Raw decoded shape before schema validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppDataDocument {
    goals: Vec<Goal>,
    profile: UserProfile,
    #[serde(default)]
    reviews: Vec<WeeklyReview>,
    settings: AppSettings,
}

impl TryFrom<AppDataDocument> for AppData {
    type Error = AppDataValidationError;

    fn try_from(value: AppDataDocument) -> Result<Self, Self::Error> {
        let mut goals = value.goals;
        goals.sort_by_key(|goal| goal.order);
        let data = Self {
            goals,
            profile: value.profile,
            reviews: value.reviews,
            settings: value.settings,
        };
        data.validate()?;
        Ok(data)
    }
}

/// Aggregate-level validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum AppDataValidationError {
    Goal(GoalValidationError),
    Settings(SettingsValidationError),
    DuplicateGoalId(String),
    OrderNotDense {
        goal_id: String,
        expected: u32,
        actual: u32,
    },
}

impl Display for AppDataValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Goal(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
            Self::DuplicateGoalId(id) => write!(f, "duplicate goal id `{id}`"),
            Self::OrderNotDense {
                goal_id,
                expected,
                actual,
            } => write!(
                f,
                "goal `{goal_id}` has order {actual}, expected {expected} (orders must be 0..N-1)"
            ),
        }
    }
}

impl Error for AppDataValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Goal(err) => Some(err),
            Self::Settings(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GoalValidationError> for AppDataValidationError {
    fn from(value: GoalValidationError) -> Self {
        Self::Goal(value)
    }
}

impl From<SettingsValidationError> for AppDataValidationError {
    fn from(value: SettingsValidationError) -> Self {
        Self::Settings(value)
    }
}

impl AppData {
    /// Validates every aggregate invariant.
    pub fn validate(&self) -> Result<(), AppDataValidationError> {
        let mut seen = HashSet::with_capacity(self.goals.len());
        for (index, goal) in self.goals.iter().enumerate() {
            goal.validate()?;
            if !seen.insert(goal.id.as_str()) {
                return Err(AppDataValidationError::DuplicateGoalId(goal.id.clone()));
            }
            let expected = index as u32;
            if goal.order != expected {
                return Err(AppDataValidationError::OrderNotDense {
                    goal_id: goal.id.clone(),
                    expected,
                    actual: goal.order,
                });
            }
        }
        self.settings.validate()?;
        Ok(())
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Number of goals that have met their target.
    pub fn completed_count(&self) -> usize {
        self.goals.iter().filter(|goal| goal.is_complete()).count()
    }

    /// Groups goals by domain, domains in first-appearance display order.
    pub fn goals_by_domain(&self) -> Vec<(GoalDomain, Vec<&Goal>)> {
        let mut groups: Vec<(GoalDomain, Vec<&Goal>)> = Vec::new();
        for goal in &self.goals {
            match groups.iter_mut().find(|(domain, _)| *domain == goal.domain) {
                Some((_, members)) => members.push(goal),
                None => groups.push((goal.domain, vec![goal])),
            }
        }
        groups
    }
}
