//! ## Summary
//! Recurrence-aware index over published events.
//!
//! Besides the primary id map, every event is expanded into derived buckets keyed
//! by title, attender, concrete day, yearly signature, day of month, weekday rule
//! and daily anchor. A day query then only touches the buckets that can match that
//! day instead of scanning all events.
//!
//! The index itself is a plain data structure; [`crate::datastore::DataStore`] owns
//! it behind a lock and forwards changes to durable storage.

mod keys;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};

use sked_core::model::{Event, EventId, Person, RecurrenceRule};

use keys::{IndexKey, YearSignature, index_keys};

type Bucket = BTreeSet<EventId>;

/// Result of [`RecurrenceIndex::insert`].
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The event was added.
    Inserted,
    /// An event with the same content already exists under the given id; nothing changed.
    Duplicate(EventId),
    /// The id was already indexed; the previous version was retracted and is returned.
    Replaced(Event),
}

/// Bucket counts of every index, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub events: usize,
    pub titles: usize,
    pub attenders: usize,
    pub concrete_days: usize,
    pub year_signatures: usize,
    pub month_days: usize,
    pub weekdays: usize,
    pub daily_anchors: usize,
}

#[derive(Debug, Default)]
pub struct RecurrenceIndex {
    events: HashMap<EventId, Event>,
    by_title: BTreeMap<String, Bucket>,
    by_attender: BTreeMap<Person, Bucket>,
    by_concrete_day: BTreeMap<NaiveDate, Bucket>,
    by_year_signature: BTreeMap<YearSignature, Bucket>,
    by_month_day: BTreeMap<u32, Bucket>,
    by_weekday: BTreeMap<RecurrenceRule, Bucket>,
    by_daily_anchor: BTreeMap<NaiveDate, Bucket>,
    daily_horizon_days: Option<u32>,
}

impl RecurrenceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits `EVERY_DAY` recurrence to `days` days after the anchor day.
    #[must_use]
    pub fn with_daily_horizon(mut self, days: Option<u32>) -> Self {
        self.daily_horizon_days = days;
        self
    }

    /// ## Summary
    /// Adds an event to the primary map and every derived index it expands into.
    ///
    /// An event whose content equals an already indexed event with a title sharing
    /// its prefix is ignored. Re-inserting a known id replaces the old version.
    pub fn insert(&mut self, event: Event) -> InsertOutcome {
        if let Some(existing) = self
            .search_title_prefix(event.title())
            .into_iter()
            .find(|candidate| candidate.same_content(&event))
        {
            tracing::debug!(
                event_id = %event.id(),
                existing_id = %existing.id(),
                "Duplicate event content, skipping insert"
            );
            return InsertOutcome::Duplicate(existing.id());
        }

        let previous = self.remove(event.id());
        let id = event.id();
        for key in index_keys(&event) {
            self.apply(key, id, BucketOp::Add);
        }
        tracing::trace!(event_id = %id, "Event indexed");
        self.events.insert(id, event);

        match previous {
            Some(old) => InsertOutcome::Replaced(old),
            None => InsertOutcome::Inserted,
        }
    }

    /// ## Summary
    /// Removes an event and unwinds every derived entry it contributed.
    ///
    /// Returns `None` if the id is unknown.
    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let event = self.events.remove(&id)?;
        for key in index_keys(&event) {
            self.apply(key, id, BucketOp::Remove);
        }
        tracing::trace!(event_id = %id, "Event retracted from index");
        Some(event)
    }

    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    #[must_use]
    pub fn get_by_title(&self, title: &str) -> Vec<&Event> {
        self.resolve(self.by_title.get(title).into_iter().flatten().copied())
    }

    #[must_use]
    pub fn get_by_attender(&self, person: &Person) -> Vec<&Event> {
        self.resolve(self.by_attender.get(person).into_iter().flatten().copied())
    }

    /// Events whose title starts with `prefix`.
    #[must_use]
    pub fn search_title_prefix(&self, prefix: &str) -> Vec<&Event> {
        let ids = self
            .by_title
            .range(prefix.to_owned()..)
            .take_while(|(title, _)| title.starts_with(prefix))
            .flat_map(|(_, bucket)| bucket.iter().copied());
        self.resolve(ids)
    }

    /// ## Summary
    /// Returns every event occurring on `day`.
    ///
    /// Union of one-off events spanning the day, weekday events, daily events
    /// anchored on or before the day (within the daily horizon), and monthly and
    /// yearly events whose signature matches. Recurring matches never precede the
    /// event's own first day.
    #[must_use]
    pub fn get_by_day(&self, day: NaiveDate) -> Vec<&Event> {
        let mut ids = Bucket::new();

        if let Some(bucket) = self.by_concrete_day.get(&day) {
            ids.extend(bucket);
        }

        let weekday = RecurrenceRule::from_weekday(day.weekday());
        ids.extend(self.started_by(self.by_weekday.get(&weekday), day));

        for (anchor, bucket) in self.by_daily_anchor.range(..=day) {
            if self.within_daily_horizon(*anchor, day) {
                ids.extend(bucket);
            }
        }

        ids.extend(self.started_by(self.by_month_day.get(&day.day()), day));
        ids.extend(self.started_by(
            self.by_year_signature.get(&YearSignature::of(day)),
            day,
        ));

        self.resolve(ids.into_iter())
    }

    /// All indexed events in natural order.
    #[must_use]
    pub fn all(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort();
        events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns true if the id appears in the primary map or any derived bucket.
    #[must_use]
    pub fn is_referenced(&self, id: EventId) -> bool {
        fn in_map<K>(map: &BTreeMap<K, Bucket>, id: EventId) -> bool {
            map.values().any(|bucket| bucket.contains(&id))
        }

        self.events.contains_key(&id)
            || in_map(&self.by_title, id)
            || in_map(&self.by_attender, id)
            || in_map(&self.by_concrete_day, id)
            || in_map(&self.by_year_signature, id)
            || in_map(&self.by_month_day, id)
            || in_map(&self.by_weekday, id)
            || in_map(&self.by_daily_anchor, id)
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            events: self.events.len(),
            titles: self.by_title.len(),
            attenders: self.by_attender.len(),
            concrete_days: self.by_concrete_day.len(),
            year_signatures: self.by_year_signature.len(),
            month_days: self.by_month_day.len(),
            weekdays: self.by_weekday.len(),
            daily_anchors: self.by_daily_anchor.len(),
        }
    }

    fn within_daily_horizon(&self, anchor: NaiveDate, day: NaiveDate) -> bool {
        self.daily_horizon_days
            .is_none_or(|days| (day - anchor).num_days() <= i64::from(days))
    }

    /// Ids from a recurring bucket whose event starts on or before `day`.
    fn started_by<'a>(
        &'a self,
        bucket: Option<&'a Bucket>,
        day: NaiveDate,
    ) -> impl Iterator<Item = EventId> + 'a {
        bucket
            .into_iter()
            .flatten()
            .copied()
            .filter(move |id| {
                self.events
                    .get(id)
                    .is_some_and(|event| event.start().date() <= day)
            })
    }

    fn resolve(&self, ids: impl Iterator<Item = EventId>) -> Vec<&Event> {
        let mut events: Vec<&Event> = ids.filter_map(|id| self.events.get(&id)).collect();
        events.sort();
        events.dedup_by_key(|event| event.id());
        events
    }

    fn apply(&mut self, key: IndexKey, id: EventId, op: BucketOp) {
        match key {
            IndexKey::Title(key) => op.apply(&mut self.by_title, key, id),
            IndexKey::Attender(key) => op.apply(&mut self.by_attender, key, id),
            IndexKey::ConcreteDay(key) => op.apply(&mut self.by_concrete_day, key, id),
            IndexKey::YearSignature(key) => op.apply(&mut self.by_year_signature, key, id),
            IndexKey::MonthDay(key) => op.apply(&mut self.by_month_day, key, id),
            IndexKey::Weekday(key) => op.apply(&mut self.by_weekday, key, id),
            IndexKey::DailyAnchor(key) => op.apply(&mut self.by_daily_anchor, key, id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BucketOp {
    Add,
    Remove,
}

impl BucketOp {
    /// Adds or removes `id` in the bucket under `key`; empty buckets are dropped.
    fn apply<K: Ord>(self, map: &mut BTreeMap<K, Bucket>, key: K, id: EventId) {
        match self {
            Self::Add => {
                map.entry(key).or_default().insert(id);
            }
            Self::Remove => {
                if let Some(bucket) = map.get_mut(&key) {
                    bucket.remove(&id);
                    if bucket.is_empty() {
                        map.remove(&key);
                    }
                }
            }
        }
    }
}
