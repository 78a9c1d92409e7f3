//! Core data types for planned training sessions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Training category for a planned session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutType {
    Endurance,
    ShortVma,
    Threshold,
    LongRun,
    Anaerobic,
    Sprint,
    Vo2Max,
    Recovery,
}

pub const ALL_WORKOUT_TYPES: [WorkoutType; 8] = [
    WorkoutType::Endurance,
    WorkoutType::ShortVma,
    WorkoutType::Threshold,
    WorkoutType::LongRun,
    WorkoutType::Anaerobic,
    WorkoutType::Sprint,
    WorkoutType::Vo2Max,
    WorkoutType::Recovery,
];

impl WorkoutType {
    /// Stable lookup key into the session type metadata table.
    pub fn code(self) -> &'static str {
        match self {
            WorkoutType::Endurance => "ef",
            WorkoutType::ShortVma => "vma",
            WorkoutType::Threshold => "threshold",
            WorkoutType::LongRun => "long_run",
            WorkoutType::Anaerobic => "anaerobic",
            WorkoutType::Sprint => "sprint",
            WorkoutType::Vo2Max => "vo2max",
            WorkoutType::Recovery => "recovery",
        }
    }
}

/// What an effort block asks the runner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortKind {
    Warmup,
    Run,
    Recovery,
    Cooldown,
}

impl EffortKind {
    pub fn label(self) -> &'static str {
        match self {
            EffortKind::Warmup => "Warm-up",
            EffortKind::Run => "Run",
            EffortKind::Recovery => "Recovery",
            EffortKind::Cooldown => "Cool-down",
        }
    }
}

/// Whether an effort targets elapsed time or covered distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetBasis {
    /// `target` is seconds.
    Time,
    /// `target` is meters.
    Distance,
}

/// Min/max bounds for a pace or heart-rate target.
///
/// Bounds are kept as entered: pace as `mm:ss` per km, heart rate as bpm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityBounds {
    pub min: String,
    pub max: String,
}

/// Desired effort level for a leaf segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intensity {
    None,
    Pace(IntensityBounds),
    HeartRate(IntensityBounds),
}

impl Intensity {
    pub fn is_none(&self) -> bool {
        matches!(self, Intensity::None)
    }
}

/// A single effort block of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effort {
    pub id: String,
    pub kind: EffortKind,
    pub basis: TargetBasis,
    /// Seconds when `basis` is time, meters when distance.
    pub target: u32,
    pub intensity: Intensity,
}

/// A container that replays its children `count` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repeat {
    pub id: String,
    pub count: u32,
    pub children: Vec<Segment>,
}

/// One block of a training session: either a leaf effort or a repeat
/// container holding an ordered list of child segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Effort(Effort),
    Repeat(Repeat),
}

impl Segment {
    pub fn id(&self) -> &str {
        match self {
            Segment::Effort(e) => &e.id,
            Segment::Repeat(r) => &r.id,
        }
    }

    /// Fresh leaf with the defaults the builder starts from: one minute on
    /// a time basis, no intensity target.
    pub fn new_effort(kind: EffortKind) -> Self {
        Segment::Effort(Effort {
            id: new_id(),
            kind,
            basis: TargetBasis::Time,
            target: 60,
            intensity: Intensity::None,
        })
    }

    /// Fresh empty repeat block with a count of one.
    pub fn new_repeat() -> Self {
        Segment::Repeat(Repeat {
            id: new_id(),
            count: 1,
            children: Vec::new(),
        })
    }

    pub fn is_warmup(&self) -> bool {
        matches!(self, Segment::Effort(e) if e.kind == EffortKind::Warmup)
    }

    pub fn is_cooldown(&self) -> bool {
        matches!(self, Segment::Effort(e) if e.kind == EffortKind::Cooldown)
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self, Segment::Repeat(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Segment::Effort(e) => e.kind.label(),
            Segment::Repeat(_) => "Repeat",
        }
    }
}

/// A planned training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub workout_type: WorkoutType,
    pub is_ai_generated: bool,
    pub segments: Vec<Segment>,
}

impl Workout {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        workout_type: WorkoutType,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            date,
            workout_type,
            is_ai_generated: false,
            segments: Vec::new(),
        }
    }
}

/// Identifier assigned at creation; immutable afterwards.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
