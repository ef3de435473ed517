use sked_test::component::db::datastore::PublishOutcome;
use sked_test::component::error::{CoreError, ServiceError, ValidationError};
use sked_test::component::model::RecurrenceRule;

use super::helpers::{alexandr, day, draft, igor, publish, service, service_over, september_parties};

/// ## Summary
/// Publishing identical content twice leaves the index unchanged.
#[test_log::test]
fn duplicate_publish_is_idempotent() {
    let service = service();
    let (first, _) = september_parties(&service);
    let before = service.data().stats();

    let copy = first
        .to_builder()
        .id(uuid::Uuid::new_v4())
        .build()
        .expect("complete event");
    let outcome = service.add(copy).expect("publish copy");

    assert_eq!(outcome, PublishOutcome::Duplicate(first.id()));
    assert_eq!(service.data().stats(), before);
    assert_eq!(service.search_by_title("Mega Party"), vec![first]);
}

/// ## Summary
/// A published event reads back by id; once removed it is gone from every index.
#[test_log::test]
fn publish_then_remove_round_trip() {
    let service = service();
    let (first, second) = september_parties(&service);

    assert_eq!(service.get(first.id()), Some(first.clone()));
    let stored = service.get(first.id()).expect("published");
    assert!(stored.same_content(&first));

    let removed = service.remove(first.id()).expect("remove");
    assert_eq!(removed, Some(first.clone()));
    assert!(service.get(first.id()).is_none());
    assert!(!service.data().is_referenced(first.id()));
    assert!(service.search_by_day(day("2020-09-07")).is_empty());
    assert_eq!(service.search_by_attender(&alexandr()), vec![second]);

    assert_eq!(service.remove(first.id()).expect("remove again"), None);
}

/// ## Summary
/// A yearly event recurs on its day-and-month from its first occurrence on.
#[test_log::test]
fn yearly_event_recurs_by_signature() {
    let service = service();
    let new_year = publish(
        &service,
        "New Year",
        "2020-01-01 00:00",
        "2020-01-01 02:00",
        [igor()],
        [RecurrenceRule::EveryYear],
    );

    assert_eq!(service.search_by_day(day("2021-01-01")), vec![new_year.clone()]);
    assert_eq!(service.search_by_day(day("2022-01-01")), vec![new_year]);
    assert!(service.search_by_day(day("2019-12-31")).is_empty());
    assert!(service.search_by_day(day("2019-01-01")).is_empty());
}

/// ## Summary
/// A yearly event spanning midnight is found on both spanned days.
#[test_log::test]
fn yearly_event_spanning_midnight() {
    let service = service();
    let new_year = publish(
        &service,
        "New Year",
        "2019-12-31 22:00",
        "2020-01-01 02:00",
        [igor()],
        [RecurrenceRule::EveryYear],
    );

    assert_eq!(service.search_by_day(day("2020-12-31")), vec![new_year.clone()]);
    assert_eq!(service.search_by_day(day("2021-01-01")), vec![new_year]);
    assert!(service.search_by_day(day("2020-12-30")).is_empty());
}

/// ## Summary
/// A Wednesday-and-Friday event must start on one of those days.
#[test_log::test]
fn weekday_period_must_match_start() {
    let service = service();
    let wednesday = service
        .create_event(
            draft("Sport", "2020-01-01 18:00", "2020-01-01 20:00"),
            [igor()],
            [RecurrenceRule::Wednesday, RecurrenceRule::Friday],
        )
        .expect("Wednesday start is valid");
    assert_eq!(service.search_by_day(day("2020-01-03")), vec![wednesday]);

    let thursday = service.create_event(
        draft("Sport", "2020-01-02 18:00", "2020-01-02 20:00"),
        [igor()],
        [RecurrenceRule::Wednesday, RecurrenceRule::Friday],
    );
    assert!(matches!(
        thursday,
        Err(ServiceError::CoreError(CoreError::Validation(
            ValidationError::WeekdayMismatch(chrono::Weekday::Thu)
        )))
    ));
    assert_eq!(service.data().len(), 1);
}

/// ## Summary
/// Daily recurrence is unbounded unless a horizon is configured.
#[test_log::test]
fn daily_recurrence_horizon() {
    let unbounded = service();
    let lunch = publish(
        &unbounded,
        "Lunch",
        "2020-01-01 12:00",
        "2020-01-01 13:00",
        [igor()],
        [RecurrenceRule::EveryDay],
    );
    assert_eq!(unbounded.search_by_day(day("2030-01-01")), vec![lunch]);

    let bounded = service_over(
        std::sync::Arc::new(sked_test::component::db::store::MemoryStore::new()),
        Some(30),
    );
    let lunch = publish(
        &bounded,
        "Lunch",
        "2020-01-01 12:00",
        "2020-01-01 13:00",
        [igor()],
        [RecurrenceRule::EveryDay],
    );
    assert_eq!(bounded.search_by_day(day("2020-01-31")), vec![lunch]);
    assert!(bounded.search_by_day(day("2020-02-01")).is_empty());
}

/// ## Summary
/// Period search unions every day of the range in natural order.
#[test_log::test]
fn search_in_period_is_ordered() {
    let service = service();
    let (first, second) = september_parties(&service);
    let rent = publish(
        &service,
        "Apartment rent",
        "2020-08-08 10:00",
        "2020-08-08 12:00",
        [alexandr()],
        [RecurrenceRule::EveryMonth],
    );

    let events = service
        .search_in_period(day("2020-09-07"), day("2020-09-09"))
        .expect("ordered range");
    assert_eq!(events, vec![rent, first, second]);
}

/// ## Summary
/// Title prefix search matches every title starting with the prefix.
#[test_log::test]
fn title_prefix_search() {
    let service = service();
    let (first, second) = september_parties(&service);

    assert_eq!(service.search_by_title_prefix("Mega"), vec![first, second]);
    assert!(service.search_by_title_prefix("Party").is_empty());
}
