//! Goal mutation use-cases.
//!
//! # Responsibility
//! - Apply manual progress, note, detail and ordering changes to a snapshot.
//! - Return a new aggregate; the input snapshot is never modified.
//!
//! # Invariants
//! - A failed mutation returns an error and produces no snapshot.
//! - Manual progress always sets `source = Manual`; `is_auto` is kept.
//! - After `reorder_goals`, `goals[i].order == i` for the new sequence.
//! - `update_details` keeps the stored `id` and `order`; ordering is owned
//!   by `reorder_goals`.

use crate::model::app_data::AppData;
use crate::model::goal::{Goal, GoalId, GoalSource, GoalType, GoalValidationError};
use crate::model::profile::UserProfile;
use crate::model::settings::{AppSettings, SettingsValidationError};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GoalServiceResult<T> = Result<T, GoalServiceError>;

/// Reorder sequence is not a permutation of the current goal ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    LengthMismatch { expected: usize, actual: usize },
    UnknownGoal(GoalId),
    DuplicateGoal(GoalId),
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "reorder sequence has {actual} goals, expected {expected}"
            ),
            Self::UnknownGoal(id) => write!(f, "reorder sequence names unknown goal `{id}`"),
            Self::DuplicateGoal(id) => write!(f, "reorder sequence repeats goal `{id}`"),
        }
    }
}

impl Error for ReorderError {}

/// Errors from goal mutation use-cases.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalServiceError {
    /// Target goal does not exist.
    GoalNotFound(GoalId),
    /// Reorder sequence failed permutation validation.
    InvalidReorder(ReorderError),
    /// Replacement record violates goal invariants.
    InvalidGoal(GoalValidationError),
    /// Progress value is negative or not finite.
    InvalidValue { goal_id: GoalId, value: f64 },
    /// Operation requires a checkbox goal.
    NotCheckbox(GoalId),
    /// Detail edits cannot move a goal; reordering goes through `reorder_goals`.
    OrderChange {
        goal_id: GoalId,
        stored: u32,
        requested: u32,
    },
    /// Settings failed validation.
    InvalidSettings(SettingsValidationError),
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::InvalidReorder(err) => write!(f, "{err}"),
            Self::InvalidGoal(err) => write!(f, "{err}"),
            Self::InvalidValue { goal_id, value } => write!(
                f,
                "progress value {value} for goal `{goal_id}` must be a finite number >= 0"
            ),
            Self::NotCheckbox(id) => write!(f, "goal `{id}` is not a checkbox goal"),
            Self::OrderChange {
                goal_id,
                stored,
                requested,
            } => write!(
                f,
                "goal `{goal_id}` order {requested} differs from stored order {stored}; use reorder"
            ),
            Self::InvalidSettings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReorder(err) => Some(err),
            Self::InvalidGoal(err) => Some(err),
            Self::InvalidSettings(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReorderError> for GoalServiceError {
    fn from(value: ReorderError) -> Self {
        Self::InvalidReorder(value)
    }
}

impl From<GoalValidationError> for GoalServiceError {
    fn from(value: GoalValidationError) -> Self {
        Self::InvalidGoal(value)
    }
}

impl From<SettingsValidationError> for GoalServiceError {
    fn from(value: SettingsValidationError) -> Self {
        Self::InvalidSettings(value)
    }
}

/// Records a manual progress value.
///
/// # Contract
/// - Sets `current = value`, `source = Manual`, `last_updated = now_ms`.
/// - Every other goal is returned unchanged.
pub fn update_progress(
    data: &AppData,
    goal_id: &str,
    value: f64,
    now_ms: i64,
) -> GoalServiceResult<AppData> {
    if !value.is_finite() || value < 0.0 {
        return Err(GoalServiceError::InvalidValue {
            goal_id: goal_id.to_string(),
            value,
        });
    }
    map_goal(data, goal_id, |goal| {
        goal.current = value;
        goal.source = GoalSource::Manual;
        goal.last_updated = Some(now_ms);
        Ok(())
    })
}

/// Adds one to the goal's value (habit card "+").
pub fn increment_progress(data: &AppData, goal_id: &str, now_ms: i64) -> GoalServiceResult<AppData> {
    let current = find_goal(data, goal_id)?.current;
    update_progress(data, goal_id, current + 1.0, now_ms)
}

/// Subtracts one from the goal's value, never going below zero.
pub fn decrement_progress(data: &AppData, goal_id: &str, now_ms: i64) -> GoalServiceResult<AppData> {
    let current = find_goal(data, goal_id)?.current;
    update_progress(data, goal_id, (current - 1.0).max(0.0), now_ms)
}

/// Flips a checkbox goal between `0` and `1`.
pub fn toggle_checkbox(data: &AppData, goal_id: &str, now_ms: i64) -> GoalServiceResult<AppData> {
    let goal = find_goal(data, goal_id)?;
    if goal.kind != GoalType::Checkbox {
        return Err(GoalServiceError::NotCheckbox(goal.id.clone()));
    }
    let next = if goal.current >= 1.0 { 0.0 } else { 1.0 };
    update_progress(data, goal_id, next, now_ms)
}

/// Replaces the note text; no other field changes.
pub fn update_note(
    data: &AppData,
    goal_id: &str,
    note: impl Into<String>,
) -> GoalServiceResult<AppData> {
    let note = note.into();
    map_goal(data, goal_id, move |goal| {
        goal.note = Some(note);
        Ok(())
    })
}

/// Replaces the full record matching `replacement.id`.
///
/// `replacement.order` must equal the stored order; a differing value is
/// rejected with [`GoalServiceError::OrderChange`].
pub fn update_details(data: &AppData, replacement: Goal) -> GoalServiceResult<AppData> {
    let goal_id = replacement.id.clone();
    map_goal(data, &goal_id, move |goal| {
        if replacement.order != goal.order {
            return Err(GoalServiceError::OrderChange {
                goal_id: goal.id.clone(),
                stored: goal.order,
                requested: replacement.order,
            });
        }
        replacement.validate()?;
        *goal = replacement;
        Ok(())
    })
}

/// Reassigns display order from a full sequence of goal ids.
///
/// # Contract
/// - `sequence` must name every existing goal exactly once.
/// - The returned goals are in `sequence` order with `order == index`.
pub fn reorder_goals<S: AsRef<str>>(data: &AppData, sequence: &[S]) -> GoalServiceResult<AppData> {
    validate_permutation(data, sequence)?;

    let by_id: HashMap<&str, &Goal> = data
        .goals
        .iter()
        .map(|goal| (goal.id.as_str(), goal))
        .collect();

    let mut goals = Vec::with_capacity(sequence.len());
    for (index, id) in sequence.iter().enumerate() {
        let goal = by_id
            .get(id.as_ref())
            .ok_or_else(|| ReorderError::UnknownGoal(id.as_ref().to_string()))?;
        let mut goal = (*goal).clone();
        goal.order = index as u32;
        goals.push(goal);
    }

    Ok(AppData {
        goals,
        ..data.clone()
    })
}

/// Replaces the profile wholesale.
pub fn update_profile(data: &AppData, profile: UserProfile) -> AppData {
    AppData {
        profile,
        ..data.clone()
    }
}

/// Replaces settings wholesale after validation.
pub fn update_settings(data: &AppData, settings: AppSettings) -> GoalServiceResult<AppData> {
    settings.validate()?;
    Ok(AppData {
        settings,
        ..data.clone()
    })
}

fn validate_permutation<S: AsRef<str>>(data: &AppData, sequence: &[S]) -> Result<(), ReorderError> {
    if sequence.len() != data.goals.len() {
        return Err(ReorderError::LengthMismatch {
            expected: data.goals.len(),
            actual: sequence.len(),
        });
    }

    let known: HashSet<&str> = data.goals.iter().map(|goal| goal.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(sequence.len());
    for id in sequence {
        let id = id.as_ref();
        if !known.contains(id) {
            return Err(ReorderError::UnknownGoal(id.to_string()));
        }
        if !seen.insert(id) {
            return Err(ReorderError::DuplicateGoal(id.to_string()));
        }
    }
    Ok(())
}

fn find_goal<'a>(data: &'a AppData, goal_id: &str) -> GoalServiceResult<&'a Goal> {
    data.goal(goal_id)
        .ok_or_else(|| GoalServiceError::GoalNotFound(goal_id.to_string()))
}

fn map_goal(
    data: &AppData,
    goal_id: &str,
    apply: impl FnOnce(&mut Goal) -> GoalServiceResult<()>,
) -> GoalServiceResult<AppData> {
    let index = data
        .goals
        .iter()
        .position(|goal| goal.id == goal_id)
        .ok_or_else(|| GoalServiceError::GoalNotFound(goal_id.to_string()))?;

    let mut next = data.clone();
    apply(&mut next.goals[index])?;
    Ok(next)
}
