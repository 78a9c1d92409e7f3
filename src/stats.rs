//! Planned-volume aggregation over the schedule, feeding the stats tab and
//! the HTML report.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::model::{ALL_WORKOUT_TYPES, Workout, WorkoutType};
use crate::segments::{self, Totals};

/// Planned volume for one ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekVolume {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub totals: Totals,
    pub sessions: usize,
}

fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Aggregate planned duration/distance per ISO week, sorted by week.
pub fn weekly_volume(workouts: &[Workout]) -> Vec<WeekVolume> {
    let mut weeks: BTreeMap<NaiveDate, (Totals, usize)> = BTreeMap::new();
    for w in workouts {
        let t = segments::totals(&w.segments);
        let entry = weeks.entry(week_start_of(w.date)).or_default();
        entry.0.duration_s += t.duration_s;
        entry.0.distance_m += t.distance_m;
        entry.1 += 1;
    }
    weeks
        .into_iter()
        .map(|(week_start, (totals, sessions))| WeekVolume {
            week_start,
            totals,
            sessions,
        })
        .collect()
}

/// Session count and planned volume per training category, in the fixed
/// category order, skipping categories with no sessions.
pub fn totals_by_type(workouts: &[Workout]) -> Vec<(WorkoutType, usize, Totals)> {
    let mut out = Vec::new();
    for t in ALL_WORKOUT_TYPES {
        let mut totals = Totals::default();
        let mut sessions = 0usize;
        for w in workouts.iter().filter(|w| w.workout_type == t) {
            let wt = segments::totals(&w.segments);
            totals.duration_s += wt.duration_s;
            totals.distance_m += wt.distance_m;
            sessions += 1;
        }
        if sessions > 0 {
            out.push((t, sessions, totals));
        }
    }
    out
}

/// Total planned effort across the whole schedule.
pub fn overall_totals(workouts: &[Workout]) -> Totals {
    let mut out = Totals::default();
    for w in workouts {
        let t = segments::totals(&w.segments);
        out.duration_s += t.duration_s;
        out.distance_m += t.distance_m;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EffortKind, Segment, TargetBasis, Workout};

    fn session(y: i32, m: u32, d: u32, t: WorkoutType, seconds: u32) -> Workout {
        let mut w = Workout::new(
            "s",
            "",
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            t,
        );
        let Segment::Effort(mut e) = Segment::new_effort(EffortKind::Run) else {
            unreachable!()
        };
        e.basis = TargetBasis::Time;
        e.target = seconds;
        w.segments = vec![Segment::Effort(e)];
        w
    }

    #[test]
    fn weekly_volume_groups_monday_weeks() {
        // 2026-02-24 (Tue) and 2026-02-26 (Thu) share the week of Mon 23rd;
        // 2026-03-02 (Mon) starts the next one.
        let workouts = vec![
            session(2026, 2, 24, WorkoutType::Endurance, 600),
            session(2026, 2, 26, WorkoutType::Threshold, 1200),
            session(2026, 3, 2, WorkoutType::Endurance, 300),
        ];
        let weeks = weekly_volume(&workouts);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start, NaiveDate::from_ymd_opt(2026, 2, 23).unwrap());
        assert_eq!(weeks[0].totals.duration_s, 1800);
        assert_eq!(weeks[0].sessions, 2);
        assert_eq!(weeks[1].week_start, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(weeks[1].totals.duration_s, 300);
    }

    #[test]
    fn totals_by_type_skips_empty_categories() {
        let workouts = vec![
            session(2026, 2, 24, WorkoutType::Endurance, 600),
            session(2026, 2, 25, WorkoutType::Endurance, 600),
            session(2026, 2, 26, WorkoutType::Sprint, 300),
        ];
        let by_type = totals_by_type(&workouts);
        assert_eq!(by_type.len(), 2);
        assert_eq!(by_type[0].0, WorkoutType::Endurance);
        assert_eq!(by_type[0].1, 2);
        assert_eq!(by_type[0].2.duration_s, 1200);
        assert_eq!(by_type[1].0, WorkoutType::Sprint);
    }

    #[test]
    fn overall_totals_sum_everything() {
        let workouts = vec![
            session(2026, 2, 24, WorkoutType::Endurance, 600),
            session(2026, 2, 26, WorkoutType::Sprint, 300),
        ];
        assert_eq!(overall_totals(&workouts).duration_s, 900);
    }
}
