use lifesync_core::persist::APP_DATA_KEY;
use lifesync_core::{
    AppData, AppState, Clock, DarkMode, EngineConfig, GoalDomain, GoalServiceError, KvStore,
    ManualClock, MemoryKvStore, SequenceRandom, SimulatedHealthFeed, Theme, UnitSystem,
};
use std::sync::Arc;
use std::time::Duration;

const T0: i64 = 1_717_000_000_000;

fn state_over(store: Arc<MemoryKvStore>) -> AppState<Arc<MemoryKvStore>> {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(T0));
    let feed = Arc::new(SimulatedHealthFeed::new(
        Duration::ZERO,
        Box::new(SequenceRandom::new([0.0])),
    ));
    AppState::new(store, clock, feed, EngineConfig::default())
}

fn stored(store: &MemoryKvStore) -> AppData {
    let raw = store.get(APP_DATA_KEY).unwrap().expect("document saved");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn fresh_store_starts_from_seed_and_is_not_onboarded() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    let snapshot = state.snapshot();

    assert_eq!(snapshot.goals.len(), 9);
    assert_eq!(snapshot.profile.name, "Alex Johnson");
    assert_eq!(snapshot.profile.units, UnitSystem::Metric);
    assert!(!snapshot.settings.is_health_connected);
    assert!(!state.is_onboarded());
    assert_eq!(state.summary().headline(), "0 of 9 complete");
}

#[test]
fn every_commit_is_saved_whole() {
    let store = Arc::new(MemoryKvStore::new());
    let state = state_over(Arc::clone(&store));

    state.update_progress("4", 100.0).unwrap();
    assert_eq!(stored(&store), *state.snapshot());

    state.toggle_checkbox("9").unwrap();
    assert_eq!(stored(&store), *state.snapshot());
    assert_eq!(state.summary().headline(), "2 of 9 complete");
}

#[test]
fn rejected_mutation_does_not_write() {
    let store = Arc::new(MemoryKvStore::new());
    let state = state_over(Arc::clone(&store));

    let err = state.toggle_checkbox("1").unwrap_err();
    assert_eq!(err, GoalServiceError::NotCheckbox("1".to_string()));
    assert!(store.get(APP_DATA_KEY).unwrap().is_none());
}

#[test]
fn subscribers_see_each_commit() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    let mut updates = state.subscribe();

    state.update_note("5", "weigh in after run").unwrap();

    assert!(updates.has_changed().unwrap());
    let seen = Arc::clone(&updates.borrow_and_update());
    assert_eq!(seen.goal("5").unwrap().note.as_deref(), Some("weigh in after run"));
    assert!(!updates.has_changed().unwrap());
}

#[test]
fn restart_resumes_from_saved_aggregate() {
    let store = Arc::new(MemoryKvStore::new());
    {
        let state = state_over(Arc::clone(&store));
        state.reorder_goals(&["9", "8", "7", "6", "5", "4", "3", "2", "1"]).unwrap();
        state.complete_onboarding().unwrap();
    }

    let restarted = state_over(store);
    let snapshot = restarted.snapshot();
    let order: Vec<&str> = snapshot.goals.iter().map(|goal| goal.id.as_str()).collect();
    assert_eq!(order, vec!["9", "8", "7", "6", "5", "4", "3", "2", "1"]);
    assert!(restarted.is_onboarded());
}

#[test]
fn goals_group_by_domain_in_display_order() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    state.reorder_goals(&["6", "1", "2", "3", "4", "5", "7", "8", "9"]).unwrap();

    let groups = state.goals_by_domain();
    assert_eq!(groups[0].0, GoalDomain::Mental);
    assert_eq!(groups[1].0, GoalDomain::Physical);
    let physical: Vec<&str> = groups[1].1.iter().map(|goal| goal.id.as_str()).collect();
    assert_eq!(physical, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn theme_follows_setting_and_host_appearance() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    assert_eq!(state.effective_theme(true), Theme::Dark);
    assert_eq!(state.effective_theme(false), Theme::Light);

    let mut settings = state.snapshot().settings.clone();
    settings.dark_mode = DarkMode::Light;
    state.update_settings(settings).unwrap();
    assert_eq!(state.effective_theme(true), Theme::Light);
}

#[test]
fn invalid_settings_are_rejected() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    let mut settings = state.snapshot().settings.clone();
    settings.notifications.morning_time = "8am".to_string();

    assert!(matches!(
        state.update_settings(settings),
        Err(GoalServiceError::InvalidSettings(_))
    ));
    assert_eq!(state.snapshot().settings.notifications.morning_time, "08:00");
}

#[test]
fn profile_update_replaces_profile_only() {
    let state = state_over(Arc::new(MemoryKvStore::new()));
    let before = state.snapshot();
    let mut profile = before.profile.clone();
    profile.name = "Jordan".to_string();
    profile.units = UnitSystem::Imperial;

    let after = state.update_profile(profile.clone());

    assert_eq!(after.profile, profile);
    assert_eq!(after.goals, before.goals);
}

#[test]
fn profile_update_is_saved() {
    let store = Arc::new(MemoryKvStore::new());
    let state = state_over(Arc::clone(&store));
    let mut profile = state.snapshot().profile.clone();
    profile.name = "Sam".to_string();

    let after = state.update_profile(profile);

    assert_eq!(stored(&store), *after);
    assert_eq!(stored(&store).profile.name, "Sam");
}
