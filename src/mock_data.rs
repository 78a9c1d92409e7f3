//! Fixture workouts used to seed the store at startup.
//!
//! There is no persistence layer; this is the only data source besides the
//! builder and the coach flow.

use chrono::NaiveDate;

use crate::model::{
    Effort, EffortKind, Intensity, IntensityBounds, Repeat, Segment, TargetBasis, Workout,
    WorkoutType, new_id,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn timed(kind: EffortKind, seconds: u32, intensity: Intensity) -> Segment {
    Segment::Effort(Effort {
        id: new_id(),
        kind,
        basis: TargetBasis::Time,
        target: seconds,
        intensity,
    })
}

fn distance(kind: EffortKind, meters: u32, intensity: Intensity) -> Segment {
    Segment::Effort(Effort {
        id: new_id(),
        kind,
        basis: TargetBasis::Distance,
        target: meters,
        intensity,
    })
}

fn repeat(count: u32, children: Vec<Segment>) -> Segment {
    Segment::Repeat(Repeat {
        id: new_id(),
        count,
        children,
    })
}

fn hr(min: &str, max: &str) -> Intensity {
    Intensity::HeartRate(IntensityBounds {
        min: min.into(),
        max: max.into(),
    })
}

fn pace(min: &str, max: &str) -> Intensity {
    Intensity::Pace(IntensityBounds {
        min: min.into(),
        max: max.into(),
    })
}

fn workout(
    title: &str,
    description: &str,
    on: NaiveDate,
    workout_type: WorkoutType,
    ai: bool,
    segments: Vec<Segment>,
) -> Workout {
    Workout {
        id: new_id(),
        title: title.into(),
        description: description.into(),
        date: on,
        workout_type,
        is_ai_generated: ai,
        segments,
    }
}

/// The fixed schedule the app starts with.
pub fn seed_workouts() -> Vec<Workout> {
    vec![
        workout(
            "Base Endurance",
            "Build the aerobic base at a conversational pace.",
            date(2026, 2, 24),
            WorkoutType::Endurance,
            false,
            vec![timed(EffortKind::Run, 45 * 60, hr("130", "150"))],
        ),
        workout(
            "Short VMA Session",
            "Improve aerobic capacity with repeated very short efforts at high intensity.",
            date(2026, 2, 25),
            WorkoutType::ShortVma,
            true,
            vec![
                timed(EffortKind::Warmup, 20 * 60, Intensity::None),
                repeat(
                    15,
                    vec![
                        timed(EffortKind::Run, 30, pace("3:20", "3:30")),
                        timed(EffortKind::Recovery, 30, Intensity::None),
                    ],
                ),
                timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
            ],
        ),
        workout(
            "Threshold Blocks",
            "Raise the lactate threshold to hold a high speed for longer.",
            date(2026, 2, 26),
            WorkoutType::Threshold,
            false,
            vec![
                timed(EffortKind::Warmup, 15 * 60, Intensity::None),
                repeat(
                    3,
                    vec![
                        timed(EffortKind::Run, 10 * 60, pace("4:10", "4:20")),
                        timed(EffortKind::Recovery, 2 * 60, Intensity::None),
                    ],
                ),
                timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
            ],
        ),
        workout(
            "Sunday Long Run",
            "Specific endurance work to prepare for the distance.",
            date(2026, 3, 1),
            WorkoutType::LongRun,
            false,
            vec![timed(EffortKind::Run, 90 * 60, hr("135", "160"))],
        ),
        workout(
            "Anaerobic Push",
            "Explosive hill efforts to improve lactate tolerance.",
            date(2026, 2, 27),
            WorkoutType::Anaerobic,
            true,
            vec![
                timed(EffortKind::Warmup, 15 * 60, Intensity::None),
                repeat(
                    10,
                    vec![
                        distance(EffortKind::Run, 200, Intensity::None),
                        timed(EffortKind::Recovery, 2 * 60, Intensity::None),
                    ],
                ),
            ],
        ),
        workout(
            "Sprint Session",
            "Develop raw speed and muscular power.",
            date(2026, 2, 28),
            WorkoutType::Sprint,
            false,
            vec![
                timed(EffortKind::Warmup, 15 * 60, Intensity::None),
                repeat(
                    6,
                    vec![
                        distance(EffortKind::Run, 80, Intensity::None),
                        timed(EffortKind::Recovery, 3 * 60, Intensity::None),
                    ],
                ),
                timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
            ],
        ),
        workout(
            "VO2 Max Development",
            "Increase maximal oxygen uptake with 5k-pace intervals.",
            date(2026, 3, 2),
            WorkoutType::Vo2Max,
            true,
            vec![
                timed(EffortKind::Warmup, 20 * 60, Intensity::None),
                repeat(
                    5,
                    vec![
                        distance(EffortKind::Run, 1000, pace("3:45", "3:55")),
                        timed(EffortKind::Recovery, 2 * 60, Intensity::None),
                    ],
                ),
                timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
            ],
        ),
        workout(
            "Recovery Jog",
            "Very slow jogging to promote blood flow after a hard session.",
            date(2026, 3, 3),
            WorkoutType::Recovery,
            false,
            vec![timed(EffortKind::Run, 30 * 60, hr("110", "130"))],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments;

    #[test]
    fn seed_spans_the_expected_dates() {
        let workouts = seed_workouts();
        assert_eq!(workouts.len(), 8);
        let mut dates: Vec<NaiveDate> = workouts.iter().map(|w| w.date).collect();
        dates.sort();
        assert_eq!(dates.first().copied(), Some(date(2026, 2, 24)));
        assert_eq!(dates.last().copied(), Some(date(2026, 3, 3)));
    }

    #[test]
    fn seed_respects_top_level_invariants() {
        for w in seed_workouts() {
            let warmups = w.segments.iter().filter(|s| s.is_warmup()).count();
            let cooldowns = w.segments.iter().filter(|s| s.is_cooldown()).count();
            assert!(warmups <= 1, "{}", w.title);
            assert!(cooldowns <= 1, "{}", w.title);
            if warmups == 1 {
                assert!(w.segments[0].is_warmup(), "{}", w.title);
            }
            if cooldowns == 1 {
                assert!(w.segments[w.segments.len() - 1].is_cooldown(), "{}", w.title);
            }
        }
    }

    #[test]
    fn vma_session_totals() {
        let workouts = seed_workouts();
        let vma = workouts
            .iter()
            .find(|w| w.workout_type == WorkoutType::ShortVma)
            .unwrap();
        let t = segments::totals(&vma.segments);
        // 20min warm-up + 15 x (30s + 30s) + 10min cool-down.
        assert_eq!(t.duration_s, 1200 + 15 * 60 + 600);
        assert_eq!(t.distance_m, 0);
    }

    #[test]
    fn seed_ids_are_unique() {
        let workouts = seed_workouts();
        let mut ids: Vec<&str> = workouts.iter().map(|w| w.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), workouts.len());
    }
}
