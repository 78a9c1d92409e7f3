//! In-memory workout collection and the transient builder draft.
//!
//! Both are owned by the application and passed explicitly; committed
//! workouts are append-only in this version.

use chrono::NaiveDate;

use crate::model::{Segment, Workout};
use crate::segments::{self, SegmentError, Totals};

/// Holds every planned workout, in insertion order.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the mock fixtures.
    pub fn seeded() -> Self {
        Self {
            workouts: crate::mock_data::seed_workouts(),
        }
    }

    /// All workouts in insertion order. Callers sort when they need a
    /// display order.
    pub fn list(&self) -> &[Workout] {
        &self.workouts
    }

    /// Workouts sorted date-ascending, the display convention for the
    /// schedule list.
    pub fn sorted_by_date(&self) -> Vec<&Workout> {
        let mut sorted: Vec<&Workout> = self.workouts.iter().collect();
        sorted.sort_by_key(|w| w.date);
        sorted
    }

    /// Append a fully-formed workout. Cross-field validation is the
    /// caller's job.
    pub fn add(&mut self, workout: Workout) {
        log::info!(
            "Adding workout '{}' on {}",
            workout.title,
            workout.date.format("%Y-%m-%d")
        );
        self.workouts.push(workout);
    }

    pub fn by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Workouts planned for an exact date, in insertion order.
    pub fn by_date(&self, date: NaiveDate) -> Vec<&Workout> {
        self.workouts.iter().filter(|w| w.date == date).collect()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

/// Working copy of a segment tree while a new workout is being built.
///
/// Single instance, scoped to one builder session; committed into a new
/// workout on save and cleared afterwards.
#[derive(Debug, Default)]
pub struct DraftSegments {
    segments: Vec<Segment>,
}

impl DraftSegments {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Replace the whole draft tree.
    pub fn set(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Insert at the top level per the kind-based placement policy. The
    /// draft is untouched when validation fails.
    pub fn insert(&mut self, segment: Segment) -> Result<(), SegmentError> {
        self.segments = segments::insert(&self.segments, segment)?;
        Ok(())
    }

    /// Append a child to the repeat with `parent_id`, subject to the
    /// nesting bound.
    pub fn add_child(&mut self, parent_id: &str, child: Segment) -> Result<(), SegmentError> {
        self.segments = segments::add_child(&self.segments, parent_id, child)?;
        Ok(())
    }

    pub fn replace(&mut self, updated: &Segment) {
        self.segments = segments::replace(&self.segments, updated);
    }

    pub fn remove(&mut self, id: &str) {
        self.segments = segments::remove(&self.segments, id);
    }

    pub fn find(&self, id: &str) -> Option<&Segment> {
        segments::find(&self.segments, id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        segments::depth_of(&self.segments, id)
    }

    pub fn totals(&self) -> Totals {
        segments::totals(&self.segments)
    }

    /// Move the draft tree into a committed workout, leaving the draft
    /// empty for the next builder session.
    pub fn take(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EffortKind, WorkoutType};

    fn workout_on(title: &str, y: i32, m: u32, d: u32) -> Workout {
        Workout::new(
            title,
            "",
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            WorkoutType::Endurance,
        )
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut store = WorkoutStore::new();
        store.add(workout_on("b", 2026, 3, 1));
        store.add(workout_on("a", 2026, 2, 24));
        let titles: Vec<&str> = store.list().iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn sorted_by_date_is_ascending() {
        let mut store = WorkoutStore::new();
        store.add(workout_on("march", 2026, 3, 1));
        store.add(workout_on("first", 2026, 2, 24));
        store.add(workout_on("second", 2026, 2, 26));
        let dates: Vec<String> = store
            .sorted_by_date()
            .iter()
            .map(|w| w.date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2026-02-24", "2026-02-26", "2026-03-01"]);
    }

    #[test]
    fn by_id_and_by_date_lookups() {
        let mut store = WorkoutStore::new();
        let w = workout_on("a", 2026, 2, 24);
        let id = w.id.clone();
        store.add(w);
        store.add(workout_on("b", 2026, 2, 24));
        store.add(workout_on("c", 2026, 2, 25));

        assert_eq!(store.by_id(&id).map(|w| w.title.as_str()), Some("a"));
        assert!(store.by_id("missing").is_none());

        let day = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();
        let titles: Vec<&str> = store.by_date(day).iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn seeded_store_has_fixtures() {
        let store = WorkoutStore::seeded();
        assert!(!store.is_empty());
    }

    #[test]
    fn draft_insert_failure_keeps_tree() {
        let mut draft = DraftSegments::default();
        draft.insert(Segment::new_effort(EffortKind::Warmup)).unwrap();
        let before = draft.segments().to_vec();
        let err = draft.insert(Segment::new_effort(EffortKind::Warmup));
        assert!(err.is_err());
        assert_eq!(draft.segments(), before.as_slice());
    }

    #[test]
    fn draft_take_clears() {
        let mut draft = DraftSegments::default();
        draft.insert(Segment::new_effort(EffortKind::Run)).unwrap();
        let taken = draft.take();
        assert_eq!(taken.len(), 1);
        assert!(draft.is_empty());
    }
}
