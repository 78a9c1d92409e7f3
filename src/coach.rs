//! Stubbed AI coach: template suggestions behind a fixed-delay timer.
//!
//! There is no model behind this; the delay only simulates generation. A
//! pending request whose tab was left is simply discarded when it fires.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::model::{
    Effort, EffortKind, Intensity, IntensityBounds, Repeat, Segment, TargetBasis, Workout,
    WorkoutType, new_id,
};

/// Simulated generation time.
pub const GENERATION_DELAY: Duration = Duration::from_millis(1200);

/// The session flavors the coach can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachFocus {
    ShortVma,
    Threshold,
    EasyRun,
    LongRun,
}

pub const ALL_FOCUSES: [CoachFocus; 4] = [
    CoachFocus::ShortVma,
    CoachFocus::Threshold,
    CoachFocus::EasyRun,
    CoachFocus::LongRun,
];

impl CoachFocus {
    pub fn label(self) -> &'static str {
        match self {
            CoachFocus::ShortVma => "Short VMA",
            CoachFocus::Threshold => "Threshold",
            CoachFocus::EasyRun => "Easy Run",
            CoachFocus::LongRun => "Long Run",
        }
    }

    pub fn workout_type(self) -> WorkoutType {
        match self {
            CoachFocus::ShortVma => WorkoutType::ShortVma,
            CoachFocus::Threshold => WorkoutType::Threshold,
            CoachFocus::EasyRun => WorkoutType::Endurance,
            CoachFocus::LongRun => WorkoutType::LongRun,
        }
    }
}

/// A suggestion request waiting on the simulated delay.
#[derive(Debug)]
pub struct PendingSuggestion {
    pub focus: CoachFocus,
    requested_at: Instant,
}

impl PendingSuggestion {
    pub fn new(focus: CoachFocus) -> Self {
        Self {
            focus,
            requested_at: Instant::now(),
        }
    }

    pub fn ready(&self) -> bool {
        self.requested_at.elapsed() >= GENERATION_DELAY
    }
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

fn pace(min: &str, max: &str) -> Intensity {
    Intensity::Pace(IntensityBounds {
        min: min.into(),
        max: max.into(),
    })
}

fn hr(min: &str, max: &str) -> Intensity {
    Intensity::HeartRate(IntensityBounds {
        min: min.into(),
        max: max.into(),
    })
}

fn repeat(count: u32, children: Vec<Segment>) -> Segment {
    Segment::Repeat(Repeat {
        id: new_id(),
        count,
        children,
    })
}

fn template_segments(focus: CoachFocus) -> Vec<Segment> {
    match focus {
        CoachFocus::ShortVma => vec![
            timed(EffortKind::Warmup, 20 * 60, Intensity::None),
            repeat(
                12,
                vec![
                    timed(EffortKind::Run, 30, pace("3:20", "3:30")),
                    timed(EffortKind::Recovery, 30, Intensity::None),
                ],
            ),
            timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
        ],
        CoachFocus::Threshold => vec![
            timed(EffortKind::Warmup, 15 * 60, Intensity::None),
            repeat(
                3,
                vec![
                    timed(EffortKind::Run, 8 * 60, pace("4:15", "4:25")),
                    timed(EffortKind::Recovery, 2 * 60, Intensity::None),
                ],
            ),
            timed(EffortKind::Cooldown, 10 * 60, Intensity::None),
        ],
        CoachFocus::EasyRun => vec![timed(EffortKind::Run, 45 * 60, hr("130", "150"))],
        CoachFocus::LongRun => vec![timed(EffortKind::Run, 100 * 60, hr("135", "155"))],
    }
}

/// Build the template suggestion for a focus, dated `date` and flagged as
/// AI-generated.
pub fn build_suggestion(focus: CoachFocus, date: NaiveDate) -> Workout {
    Workout {
        id: new_id(),
        title: format!("Suggested {} Session", focus.label()),
        description: format!(
            "Generated {} workout based on your recent training.",
            focus.label().to_lowercase()
        ),
        date,
        workout_type: focus.workout_type(),
        is_ai_generated: true,
        segments: template_segments(focus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 24).unwrap()
    }

    #[test]
    fn suggestions_are_flagged_and_dated() {
        for focus in ALL_FOCUSES {
            let w = build_suggestion(focus, today());
            assert!(w.is_ai_generated);
            assert_eq!(w.date, today());
            assert_eq!(w.workout_type, focus.workout_type());
            assert!(!w.segments.is_empty());
        }
    }

    #[test]
    fn interval_templates_keep_warmup_first_cooldown_last() {
        for focus in [CoachFocus::ShortVma, CoachFocus::Threshold] {
            let w = build_suggestion(focus, today());
            assert!(w.segments[0].is_warmup());
            assert!(w.segments[w.segments.len() - 1].is_cooldown());
        }
    }

    #[test]
    fn vma_template_volume() {
        let w = build_suggestion(CoachFocus::ShortVma, today());
        let t = segments::totals(&w.segments);
        assert_eq!(t.duration_s, 20 * 60 + 12 * 60 + 10 * 60);
    }

    #[test]
    fn pending_suggestion_waits_for_delay() {
        let pending = PendingSuggestion::new(CoachFocus::EasyRun);
        assert!(!pending.ready());
    }
}
