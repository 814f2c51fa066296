use lifesync_core::service::goal_service::{reorder_goals, update_progress};
use lifesync_core::{
    default_app_data, AppState, Clock, EngineConfig, GoalServiceError, GoalSource, ManualClock,
    MemoryKvStore, ReorderError, SequenceRandom, SimulatedHealthFeed,
};
use std::sync::Arc;
use std::time::Duration;

const T0: i64 = 1_717_000_000_000;

fn state_with_clock() -> (AppState<MemoryKvStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let feed = Arc::new(SimulatedHealthFeed::new(
        Duration::ZERO,
        Box::new(SequenceRandom::new([0.5])),
    ));
    let state = AppState::new(MemoryKvStore::new(), dyn_clock, feed, EngineConfig::default());
    (state, clock)
}

fn ids(state: &AppState<MemoryKvStore>) -> Vec<String> {
    state.snapshot().goals.iter().map(|goal| goal.id.clone()).collect()
}

#[test]
fn manual_progress_on_count_goal_updates_only_that_goal() {
    let (state, clock) = state_with_clock();
    let before = state.snapshot();
    clock.advance(60_000);

    let after = state.update_progress("2", 40.0).unwrap();

    let pushups = after.goal("2").unwrap();
    assert_eq!(pushups.current, 40.0);
    assert_eq!(pushups.source, GoalSource::Manual);
    assert_eq!(pushups.last_updated, Some(T0 + 60_000));
    for (old, new) in before.goals.iter().zip(after.goals.iter()) {
        if old.id != "2" {
            assert_eq!(old, new);
        }
    }
    assert_eq!(after.profile, before.profile);
    assert_eq!(after.settings, before.settings);
    assert_eq!(before.goal("2").unwrap().current, 0.0, "old snapshot is immutable");
}

#[test]
fn manual_override_of_auto_goal_keeps_auto_flag() {
    let (state, _) = state_with_clock();
    let after = state.update_progress("1", 12_000.0).unwrap();

    let steps = after.goal("1").unwrap();
    assert!(steps.is_auto);
    assert_eq!(steps.source, GoalSource::Manual);
    assert_eq!(steps.current, 12_000.0);
}

#[test]
fn update_progress_is_idempotent_apart_from_timestamp() {
    let data = default_app_data(T0);
    let once = update_progress(&data, "7", 3.0, T0 + 1).unwrap();
    let twice = update_progress(&once, "7", 3.0, T0 + 1).unwrap();
    assert_eq!(once, twice);

    let later = update_progress(&once, "7", 3.0, T0 + 9).unwrap();
    assert_eq!(later.goal("7").unwrap().current, 3.0);
    assert_eq!(later.goal("7").unwrap().last_updated, Some(T0 + 9));
}

#[test]
fn progress_can_exceed_target() {
    let (state, _) = state_with_clock();
    let after = state.update_progress("7", 9.0).unwrap();
    assert_eq!(after.goal("7").unwrap().current, 9.0);
    assert!(after.goal("7").unwrap().is_complete());
}

#[test]
fn unknown_goal_leaves_state_unchanged() {
    let (state, _) = state_with_clock();
    let before = state.snapshot();

    let err = state.update_progress("42", 1.0).unwrap_err();
    assert_eq!(err, GoalServiceError::GoalNotFound("42".to_string()));
    assert!(Arc::ptr_eq(&before, &state.snapshot()));
}

#[test]
fn reorder_moves_goal_to_front_and_reindexes() {
    let (state, _) = state_with_clock();
    let sequence = ["4", "1", "2", "3", "5", "6", "7", "8", "9"];

    let after = state.reorder_goals(&sequence).unwrap();

    let order: Vec<(&str, u32)> = after
        .goals
        .iter()
        .map(|goal| (goal.id.as_str(), goal.order))
        .collect();
    assert_eq!(
        order,
        vec![
            ("4", 0),
            ("1", 1),
            ("2", 2),
            ("3", 3),
            ("5", 4),
            ("6", 5),
            ("7", 6),
            ("8", 7),
            ("9", 8),
        ]
    );
    assert!(after.validate().is_ok());
}

#[test]
fn reversing_sequence_inverts_order_and_keeps_count() {
    let data = default_app_data(T0);
    let mut sequence: Vec<String> = data.goals.iter().map(|goal| goal.id.clone()).collect();
    sequence.reverse();

    let once = reorder_goals(&data, &sequence).unwrap();
    assert_eq!(once.goals.len(), 9);
    for original in &data.goals {
        let moved = once.goal(&original.id).unwrap();
        assert_eq!(moved.order, 8 - original.order);
    }

    let twice = reorder_goals(&once, &sequence).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn reorder_with_identity_sequence_is_a_no_op() {
    let data = default_app_data(T0);
    let sequence: Vec<String> = data.goals.iter().map(|goal| goal.id.clone()).collect();
    assert_eq!(reorder_goals(&data, &sequence).unwrap(), data);
}

#[test]
fn invalid_reorder_sequences_are_rejected_without_changes() {
    let (state, _) = state_with_clock();
    let before = ids(&state);

    let short = state.reorder_goals(&["1", "2"]).unwrap_err();
    assert_eq!(
        short,
        GoalServiceError::InvalidReorder(ReorderError::LengthMismatch {
            expected: 9,
            actual: 2
        })
    );

    let duplicate = state
        .reorder_goals(&["1", "1", "2", "3", "4", "5", "6", "7", "8"])
        .unwrap_err();
    assert_eq!(
        duplicate,
        GoalServiceError::InvalidReorder(ReorderError::DuplicateGoal("1".to_string()))
    );

    let unknown = state
        .reorder_goals(&["1", "2", "3", "4", "5", "6", "7", "8", "x"])
        .unwrap_err();
    assert_eq!(
        unknown,
        GoalServiceError::InvalidReorder(ReorderError::UnknownGoal("x".to_string()))
    );

    assert_eq!(ids(&state), before);
}

#[test]
fn note_and_details_edits_persist_through_reorder() {
    let (state, _) = state_with_clock();
    state.update_note("6", "finish chapter 4").unwrap();
    let mut reading = state.snapshot().goal("6").unwrap().clone();
    reading.title = "Read 20 Pages".to_string();
    state.update_details(reading).unwrap();

    let sequence = ["6", "1", "2", "3", "4", "5", "7", "8", "9"];
    let after = state.reorder_goals(&sequence).unwrap();
    let goal = &after.goals[0];
    assert_eq!(goal.id, "6");
    assert_eq!(goal.title, "Read 20 Pages");
    assert_eq!(goal.note.as_deref(), Some("finish chapter 4"));
}

#[test]
fn checkbox_toggle_and_counter_steps() {
    let (state, _) = state_with_clock();
    state.toggle_checkbox("8").unwrap();
    state.increment_progress("7").unwrap();
    state.increment_progress("7").unwrap();
    state.decrement_progress("7").unwrap();

    let snapshot = state.snapshot();
    assert_eq!(snapshot.goal("8").unwrap().current, 1.0);
    assert_eq!(snapshot.goal("7").unwrap().current, 1.0);
    assert_eq!(state.summary().completed, 1);
}

#[test]
fn details_edit_cannot_move_goal() {
    let (state, _) = state_with_clock();
    let before = state.snapshot();
    let mut squats = before.goal("4").unwrap().clone();
    squats.title = "Goblet Squats".to_string();
    squats.order = 7;

    let err = state.update_details(squats).unwrap_err();

    assert_eq!(
        err,
        GoalServiceError::OrderChange {
            goal_id: "4".to_string(),
            stored: 3,
            requested: 7,
        }
    );
    assert!(Arc::ptr_eq(&before, &state.snapshot()));
}
