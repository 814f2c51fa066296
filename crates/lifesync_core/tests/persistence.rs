use lifesync_core::persist::{APP_DATA_KEY, ONBOARDED_KEY};
use lifesync_core::{
    default_app_data, AppState, Clock, EngineConfig, GoalSource, KvStore, ManualClock,
    MemoryKvStore, PersistenceError, PersistenceGateway, SequenceRandom, SimulatedHealthFeed,
    SqliteKvStore, StoreError, StoreResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const NOW_MS: i64 = 1_717_000_000_000;

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(NOW_MS))
}

/// Store that starts failing writes once `fail_writes` is set.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKvStore,
    fail_writes: AtomicBool,
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }
}

fn app_state<S: KvStore>(store: S) -> AppState<S> {
    let feed = Arc::new(SimulatedHealthFeed::new(
        Duration::ZERO,
        Box::new(SequenceRandom::new([0.0])),
    ));
    AppState::new(store, clock(), feed, EngineConfig::default())
}

#[test]
fn save_then_load_returns_equal_aggregate() {
    let gateway = PersistenceGateway::new(MemoryKvStore::new(), clock());
    let mut data = default_app_data(NOW_MS);
    data.goals[1].current = 42.0;
    data.goals[1].note = Some("two sets before lunch".to_string());
    data.goals[4].current = 83.7;
    data.profile.name = "Sam".to_string();

    gateway.save(&data).unwrap();
    assert_eq!(gateway.try_load().unwrap(), data);
}

#[test]
fn stored_document_uses_camel_case_keys_and_source_labels() {
    let store = Arc::new(MemoryKvStore::new());
    let gateway = PersistenceGateway::new(Arc::clone(&store), clock());
    gateway.save(&default_app_data(NOW_MS)).unwrap();

    let raw = store.get(APP_DATA_KEY).unwrap().expect("document written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let steps = &value["goals"][0];
    assert_eq!(steps["isAuto"], serde_json::json!(true));
    assert_eq!(steps["type"], serde_json::json!("metric"));
    assert_eq!(steps["source"], serde_json::json!("Apple Health"));
    assert_eq!(value["goals"][1]["source"], serde_json::json!("Manual check-in"));
    assert!(value["settings"]["isHealthConnected"].is_boolean());
}

#[test]
fn corrupt_document_falls_back_to_seed() {
    let store = MemoryKvStore::with_entries([(APP_DATA_KEY, "{\"goals\": [1, 2")]);
    let gateway = PersistenceGateway::new(store, clock());

    assert!(matches!(gateway.try_load(), Err(PersistenceError::Decode(_))));
    assert_eq!(gateway.load(), default_app_data(NOW_MS));
}

#[test]
fn schema_violation_falls_back_to_seed() {
    let mut value = serde_json::to_value(default_app_data(NOW_MS)).unwrap();
    value["goals"][2]["id"] = value["goals"][1]["id"].clone();
    let store = MemoryKvStore::with_entries([(APP_DATA_KEY, value.to_string())]);
    let gateway = PersistenceGateway::new(store, clock());

    assert!(matches!(gateway.try_load(), Err(PersistenceError::Decode(_))));
    assert_eq!(gateway.load().goals.len(), 9);
}

#[test]
fn onboarded_flag_is_true_only_for_literal_true() {
    for (raw, expected) in [("true", true), ("false", false), ("TRUE", false), ("1", false)] {
        let gateway = PersistenceGateway::new(
            MemoryKvStore::with_entries([(ONBOARDED_KEY, raw)]),
            clock(),
        );
        assert_eq!(gateway.is_onboarded(), expected, "raw value {raw:?}");
    }

    let gateway = PersistenceGateway::new(MemoryKvStore::new(), clock());
    assert!(!gateway.is_onboarded());
    gateway.set_onboarded(true).unwrap();
    assert!(gateway.is_onboarded());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifesync.sqlite3");

    {
        let state = app_state(SqliteKvStore::open(&path).unwrap());
        state.update_progress("3", 35.0).unwrap();
        state.update_note("3", "core day").unwrap();
        state.complete_onboarding().unwrap();
    }

    let reopened = app_state(SqliteKvStore::open(&path).unwrap());
    let snapshot = reopened.snapshot();
    let situps = snapshot.goal("3").unwrap();
    assert_eq!(situps.current, 35.0);
    assert_eq!(situps.note.as_deref(), Some("core day"));
    assert_eq!(situps.source, GoalSource::Manual);
    assert_eq!(situps.last_updated, Some(NOW_MS));
    assert!(reopened.is_onboarded());
}

#[test]
fn write_failure_keeps_in_memory_snapshot() {
    let store = Arc::new(FlakyStore::default());
    let state = app_state(Arc::clone(&store));
    state.update_progress("2", 10.0).unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    let committed = state.update_progress("2", 20.0).unwrap();
    assert_eq!(committed.goal("2").unwrap().current, 20.0);
    assert_eq!(state.snapshot().goal("2").unwrap().current, 20.0);

    let gateway = PersistenceGateway::new(Arc::clone(&store), clock());
    assert_eq!(gateway.try_load().unwrap().goal("2").unwrap().current, 10.0);
    assert!(matches!(
        state.complete_onboarding(),
        Err(PersistenceError::Write(StoreError::Unavailable(_)))
    ));
}
