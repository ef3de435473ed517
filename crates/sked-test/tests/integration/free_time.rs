use chrono::TimeDelta;

use sked_test::component::error::{CoreError, ServiceError};
use sked_test::component::freetime::merge_solid_intervals;
use sked_test::component::model::{Interval, RecurrenceRule};

use super::helpers::{
    alexandr, at, draft, igor, interval, publish, sergey, service, september_parties,
};

/// ## Summary
/// Without events the whole range is free.
#[test_log::test]
fn empty_calendar_is_one_free_interval() {
    let service = service();
    let range = interval("2020-09-08 12:00", "2020-09-10 21:00");

    assert_eq!(
        service.search_free_time(range.start, range.end).expect("ordered"),
        vec![range]
    );
    assert_eq!(
        service.search_free_time_slots(range.start, range.end).expect("ordered"),
        vec![range]
    );
}

/// ## Summary
/// Only the party inside the range blocks time; the one before it is ignored.
#[test_log::test]
fn september_free_time() {
    let service = service();
    september_parties(&service);
    let (start, end) = (at("2020-09-08 12:00"), at("2020-09-10 21:00"));

    let expected = vec![
        interval("2020-09-08 12:00", "2020-09-09 13:00"),
        interval("2020-09-09 18:00", "2020-09-10 21:00"),
    ];
    assert_eq!(service.search_free_time(start, end).expect("ordered"), expected);
    assert_eq!(service.search_free_time_slots(start, end).expect("ordered"), expected);
}

/// ## Summary
/// Events touching and overlapping the range edges over a weekend.
#[test_log::test]
fn weekend_free_time() {
    let service = service();
    for (title, start, end) in [
        ("Party", "2020-10-31 15:00", "2020-10-31 20:00"),
        ("Trip", "2020-11-01 09:00", "2020-11-02 12:00"),
        ("Call", "2020-11-02 12:10", "2020-11-02 12:30"),
    ] {
        publish(&service, title, start, end, [igor()], [RecurrenceRule::Once]);
    }
    let (start, end) = (at("2020-10-31 14:45"), at("2020-11-02 14:45"));

    let expected = vec![
        interval("2020-10-31 14:45", "2020-10-31 15:00"),
        interval("2020-10-31 20:00", "2020-11-01 09:00"),
        interval("2020-11-02 12:30", "2020-11-02 14:45"),
    ];
    assert_eq!(service.search_free_time(start, end).expect("ordered"), expected);
    assert_eq!(service.search_free_time_slots(start, end).expect("ordered"), expected);
}

/// ## Summary
/// Every minute of the range is either busy or free, never both and never neither.
#[test_log::test]
fn busy_and_free_cover_range_exactly() {
    let service = service();
    let busy = [
        publish(&service, "Review", "2020-09-08 10:00", "2020-09-08 11:30", [igor()], [RecurrenceRule::Once]).span(),
        publish(&service, "Demo", "2020-09-08 13:15", "2020-09-08 14:00", [sergey()], [RecurrenceRule::Once]).span(),
    ];
    let range = interval("2020-09-08 09:00", "2020-09-08 17:00");

    let strategies = [
        service.search_free_time(range.start, range.end).expect("ordered"),
        service.search_free_time_slots(range.start, range.end).expect("ordered"),
    ];
    for free in strategies {
        let mut minute = range.start;
        while minute < range.end {
            let is_busy = busy.iter().any(|span| span.start <= minute && minute < span.end);
            let is_free = free.iter().any(|span| span.start <= minute && minute < span.end);
            assert!(is_busy != is_free, "minute {minute} busy={is_busy} free={is_free}");
            minute += TimeDelta::minutes(1);
        }
    }
}

/// ## Summary
/// Merging the merged slot scan output changes nothing.
#[test_log::test]
fn merge_is_idempotent() {
    let service = service();
    september_parties(&service);

    let free = service
        .search_free_time_slots(at("2020-09-07 12:00"), at("2020-09-10 21:00"))
        .expect("ordered");
    assert_eq!(merge_solid_intervals(&free), free);
    assert!(merge_solid_intervals(&[]).is_empty());
}

/// ## Summary
/// An attender is free when their events only touch the period.
#[test_log::test]
fn attender_free_outside_events() {
    let service = service();
    let (first, second) = september_parties(&service);

    assert!(service
        .is_attender_free(&alexandr(), at("2020-09-07 19:00"), at("2020-09-09 13:00"))
        .expect("ordered"));
    assert!(!service
        .is_attender_free(&alexandr(), at("2020-09-07 18:00"), at("2020-09-08 12:00"))
        .expect("ordered"));
    assert!(!service
        .is_attender_free(&alexandr(), at("2020-09-09 12:00"), at("2020-09-09 14:00"))
        .expect("ordered"));

    let in_period = service
        .search_by_attender_in_period(&alexandr(), at("2020-09-07 12:00"), at("2020-09-09 16:00"))
        .expect("ordered");
    assert_eq!(in_period, vec![first, second]);
}

/// ## Summary
/// Weekly occurrences block time on every matching weekday.
#[test_log::test]
fn weekly_event_blocks_each_occurrence() {
    let service = service();
    // 2020-10-20 is a Tuesday
    publish(
        &service,
        "Gym",
        "2020-10-20 18:00",
        "2020-10-20 20:00",
        [igor()],
        [RecurrenceRule::Tuesday, RecurrenceRule::Thursday],
    );

    assert_eq!(
        service
            .search_free_time(at("2020-10-22 17:00"), at("2020-10-22 21:00"))
            .expect("ordered"),
        vec![
            interval("2020-10-22 17:00", "2020-10-22 18:00"),
            interval("2020-10-22 20:00", "2020-10-22 21:00"),
        ]
    );
    assert_eq!(
        service
            .search_free_time(at("2020-10-23 17:00"), at("2020-10-23 21:00"))
            .expect("ordered"),
        vec![interval("2020-10-23 17:00", "2020-10-23 21:00")]
    );
    assert!(!service
        .is_attender_free(&igor(), at("2020-10-27 19:00"), at("2020-10-27 19:30"))
        .expect("ordered"));
}

/// ## Summary
/// Placement with attenders only considers the candidate's attenders.
#[test_log::test]
fn free_time_for_event_with_attenders() {
    let service = service();
    september_parties(&service);
    publish(
        &service,
        "Sergey's workshop",
        "2020-09-10 09:00",
        "2020-09-10 17:00",
        [sergey()],
        [RecurrenceRule::Once],
    );
    let candidate = draft("Meetup", "2020-09-08 09:00", "2020-09-08 14:00")
        .into_builder([igor()], [RecurrenceRule::Once])
        .expect("parsed")
        .build()
        .expect("complete event");
    let (start, end) = (at("2020-09-08 12:00"), at("2020-09-10 21:00"));

    assert_eq!(
        service
            .search_free_time_for_event_with_attenders(&candidate, start, end)
            .expect("ordered"),
        vec![
            interval("2020-09-08 12:00", "2020-09-09 13:00"),
            interval("2020-09-09 18:00", "2020-09-10 21:00"),
        ]
    );
    assert_eq!(
        service
            .search_free_time_for_event(&candidate, start, end)
            .expect("ordered"),
        vec![
            interval("2020-09-08 12:00", "2020-09-09 13:00"),
            interval("2020-09-09 18:00", "2020-09-10 09:00"),
        ]
    );
}

/// ## Summary
/// Inverted ranges are rejected before any lookup.
#[test_log::test]
fn inverted_ranges_are_rejected() {
    let service = service();
    let (start, end) = (at("2020-09-10 21:00"), at("2020-09-08 12:00"));

    for result in [
        service.search_free_time(start, end).map(|_| ()),
        service.search_free_time_slots(start, end).map(|_| ()),
        service.is_attender_free(&igor(), start, end).map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(ServiceError::CoreError(CoreError::InvertedRange { .. }))
        ));
    }

    let free: Vec<Interval> = service.search_free_time(end, end).expect("empty range");
    assert!(free.is_empty());
    let slots: Vec<Interval> = service.search_free_time_slots(end, end).expect("empty range");
    assert!(slots.is_empty());
}
