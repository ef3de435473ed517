use std::sync::Arc;

use sked_test::component::app::bootstrap;
use sked_test::component::config::{
    LoggingConfig, SchedulingConfig, Settings, StoreConfig, StoreKind,
};
use sked_test::component::constants::EVENT_FILE_SUFFIX;
use sked_test::component::db::store::{EventStore, JsonFileStore};
use sked_test::component::model::{Event, RecurrenceRule};

use super::helpers::{alexandr, day, igor, publish, service_over, september_parties};

fn file_settings(path: &std::path::Path) -> Settings {
    Settings {
        store: StoreConfig {
            kind: StoreKind::File,
            path: path.to_string_lossy().into_owned(),
        },
        scheduling: SchedulingConfig::default(),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// ## Summary
/// Events written through the service are indexed again after a restart.
#[test_log::test]
fn file_store_rehydrates_index() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonFileStore::open(dir.path()).expect("open store"));
    let service = service_over(store, None);

    let (first, second) = september_parties(&service);
    let gym = publish(
        &service,
        "Gym",
        "2020-10-20 18:00",
        "2020-10-20 20:00",
        [igor()],
        [RecurrenceRule::Tuesday, RecurrenceRule::Thursday],
    );
    assert!(dir.path().join(format!("{}{EVENT_FILE_SUFFIX}", gym.id())).is_file());

    let restarted = bootstrap(&file_settings(dir.path())).expect("bootstrap");
    assert_eq!(restarted.data().len(), 3);
    assert_eq!(restarted.data().stats(), service.data().stats());

    let reloaded = restarted.get(gym.id()).expect("gym reloaded");
    assert!(reloaded.same_content(&gym));
    assert_eq!(restarted.search_by_day(day("2020-10-29")), vec![gym]);
    assert_eq!(restarted.search_by_attender(&alexandr()), vec![first, second]);
}

/// ## Summary
/// Removing an event deletes its document, so it stays gone after a restart.
#[test_log::test]
fn removed_event_is_not_rehydrated() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonFileStore::open(dir.path()).expect("open store"));
    let service = service_over(store.clone(), None);

    let (first, second) = september_parties(&service);
    service.remove(first.id()).expect("remove");

    let stored: Vec<Event> = store.read_all().expect("read all");
    assert_eq!(stored, vec![second.clone()]);

    let restarted = bootstrap(&file_settings(dir.path())).expect("bootstrap");
    assert!(restarted.get(first.id()).is_none());
    assert_eq!(restarted.search_by_title("Mega Party 2"), vec![second]);
}

/// ## Summary
/// Stray and corrupt files in the store directory do not prevent startup.
#[test_log::test]
fn stray_files_are_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonFileStore::open(dir.path()).expect("open store"));
    let service = service_over(store, None);
    let (first, _) = september_parties(&service);

    std::fs::write(dir.path().join("README.txt"), "calendar data").expect("write stray file");
    std::fs::write(dir.path().join("half-written.json"), "{\"id\":").expect("write corrupt file");

    let restarted = bootstrap(&file_settings(dir.path())).expect("bootstrap");
    assert_eq!(restarted.data().len(), 2);
    assert!(restarted.get(first.id()).is_some());
}

/// ## Summary
/// Stored documents carry every event field, including people and rules.
#[test_log::test]
fn stored_document_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonFileStore::open(dir.path()).expect("open store"));
    let service = service_over(store, None);
    let (first, _) = september_parties(&service);

    let text = std::fs::read_to_string(dir.path().join(format!("{}{EVENT_FILE_SUFFIX}", first.id())))
        .expect("document written");
    let document: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(document["title"], "Mega Party");
    assert_eq!(document["period"], serde_json::json!(["ONCE"]));
    assert_eq!(document["attenders"].as_array().map(Vec::len), Some(3));
}
