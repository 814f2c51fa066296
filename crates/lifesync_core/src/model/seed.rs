//! Built-in seed aggregate used on first launch and on load fallback.

use crate::model::app_data::AppData;
use crate::model::goal::{AutoRule, CompletionDirection, Goal, GoalDomain, GoalSource, GoalType};
use crate::model::profile::{UnitSystem, UserProfile};
use crate::model::settings::AppSettings;

struct SeedGoal {
    id: &'static str,
    title: &'static str,
    domain: GoalDomain,
    kind: GoalType,
    target: f64,
    current: f64,
    unit: Option<&'static str>,
    icon: &'static str,
    streak: u32,
    auto_rule: Option<AutoRule>,
    direction: CompletionDirection,
}

const fn manual(
    id: &'static str,
    title: &'static str,
    domain: GoalDomain,
    kind: GoalType,
    target: f64,
    unit: Option<&'static str>,
    icon: &'static str,
    streak: u32,
) -> SeedGoal {
    SeedGoal {
        id,
        title,
        domain,
        kind,
        target,
        current: 0.0,
        unit,
        icon,
        streak,
        auto_rule: None,
        direction: CompletionDirection::AtLeast,
    }
}

const SEED_GOALS: &[SeedGoal] = &[
    SeedGoal {
        id: "1",
        title: "Steps",
        domain: GoalDomain::Physical,
        kind: GoalType::Metric,
        target: 15000.0,
        current: 8420.0,
        unit: Some("steps"),
        icon: "🏃",
        streak: 5,
        auto_rule: Some(AutoRule::Counter),
        direction: CompletionDirection::AtLeast,
    },
    manual("2", "Push-ups", GoalDomain::Physical, GoalType::Count, 100.0, Some("reps"), "💪", 1),
    manual("3", "Sit-ups", GoalDomain::Physical, GoalType::Count, 100.0, Some("reps"), "🤸", 0),
    manual("4", "Squats", GoalDomain::Physical, GoalType::Count, 100.0, Some("reps"), "🦵", 4),
    SeedGoal {
        id: "5",
        title: "Weight",
        domain: GoalDomain::Physical,
        kind: GoalType::Metric,
        target: 80.0,
        current: 84.3,
        unit: Some("kg"),
        icon: "⚖️",
        streak: 12,
        auto_rule: Some(AutoRule::Drift),
        direction: CompletionDirection::AtMost,
    },
    manual("6", "Read 10 Pages", GoalDomain::Mental, GoalType::Checkbox, 1.0, None, "📖", 7),
    manual("7", "Daily Prayers", GoalDomain::Spiritual, GoalType::Count, 5.0, None, "🙏", 3),
    manual("8", "Family Connection", GoalDomain::Emotional, GoalType::Checkbox, 1.0, None, "👨‍👩‍👧", 2),
    manual("9", "New Project Idea", GoalDomain::Financial, GoalType::Checkbox, 1.0, None, "💡", 1),
];

/// Builds the seed aggregate with timestamps taken from `now_ms`.
///
/// Auto-tracked seed goals start with `AppleHealth` provenance; sync stays
/// disabled until the user connects the health source.
pub fn default_app_data(now_ms: i64) -> AppData {
    let goals = SEED_GOALS
        .iter()
        .enumerate()
        .map(|(index, seed)| seed_goal(seed, index as u32, now_ms))
        .collect();

    AppData {
        goals,
        profile: default_profile(now_ms),
        reviews: Vec::new(),
        settings: AppSettings::default(),
    }
}

pub fn default_profile(now_ms: i64) -> UserProfile {
    UserProfile {
        name: "Alex Johnson".to_string(),
        height: None,
        weight: Some(84.3),
        weight_goal: Some(80.0),
        units: UnitSystem::Metric,
        last_sync: Some(now_ms),
    }
}

fn seed_goal(seed: &SeedGoal, order: u32, now_ms: i64) -> Goal {
    let is_auto = seed.auto_rule.is_some();
    Goal {
        current: seed.current,
        unit: seed.unit.map(str::to_string),
        icon: Some(seed.icon.to_string()),
        is_auto,
        streak: seed.streak,
        order,
        source: if is_auto {
            GoalSource::AppleHealth
        } else {
            GoalSource::Manual
        },
        last_updated: is_auto.then_some(now_ms),
        direction: seed.direction,
        auto_rule: seed.auto_rule,
        ..Goal::manual(seed.id, seed.title, seed.domain, seed.kind, seed.target)
    }
}
