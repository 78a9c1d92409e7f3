//! Static metadata for the eight training categories.

use phf::phf_map;

use crate::model::{EffortKind, Segment, WorkoutType};

/// Display metadata for a training category.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub label: &'static str,
    pub short: &'static str,
    pub blurb: &'static str,
    /// Accent color as RGB.
    pub color: [u8; 3],
}

static FALLBACK: TypeInfo = TypeInfo {
    label: "Session",
    short: "?",
    blurb: "",
    color: [0x94, 0xA3, 0xB8],
};

static SESSION_TYPES: phf::Map<&'static str, TypeInfo> = phf_map! {
    "ef" => TypeInfo {
        label: "Base Endurance",
        short: "EF",
        blurb: "Conversational-pace running to build the aerobic base.",
        color: [0x00, 0x66, 0xFF],
    },
    "vma" => TypeInfo {
        label: "Short VMA",
        short: "VMA",
        blurb: "Repeated very short efforts at maximal aerobic speed.",
        color: [0xFF, 0x4B, 0x2B],
    },
    "threshold" => TypeInfo {
        label: "Threshold",
        short: "Seuil",
        blurb: "Sustained blocks around the lactate threshold.",
        color: [0xF5, 0x9E, 0x0B],
    },
    "long_run" => TypeInfo {
        label: "Long Run",
        short: "SL",
        blurb: "Extended outing to prepare for race distance.",
        color: [0x25, 0x63, 0xEB],
    },
    "anaerobic" => TypeInfo {
        label: "Anaerobic",
        short: "Ana",
        blurb: "Explosive efforts to raise lactate tolerance.",
        color: [0x93, 0x33, 0xEA],
    },
    "sprint" => TypeInfo {
        label: "Sprints",
        short: "Spr",
        blurb: "Pure speed and muscular power work.",
        color: [0xE1, 0x1D, 0x48],
    },
    "vo2max" => TypeInfo {
        label: "VO2 Max",
        short: "VO2",
        blurb: "Intervals at the ceiling of oxygen uptake.",
        color: [0xDC, 0x26, 0x26],
    },
    "recovery" => TypeInfo {
        label: "Recovery",
        short: "Rec",
        blurb: "Very easy running to promote recovery.",
        color: [0x8B, 0x5C, 0xF6],
    },
};

pub fn info(workout_type: WorkoutType) -> &'static TypeInfo {
    SESSION_TYPES.get(workout_type.code()).unwrap_or(&FALLBACK)
}

/// Accent color for a segment row in the builder and detail views.
pub fn segment_color(segment: &Segment) -> [u8; 3] {
    match segment {
        Segment::Effort(e) => match e.kind {
            EffortKind::Warmup => [0xEF, 0x44, 0x44],
            EffortKind::Run => [0x3B, 0x82, 0xF6],
            EffortKind::Recovery => [0x6B, 0x72, 0x80],
            EffortKind::Cooldown => [0x10, 0xB9, 0x81],
        },
        Segment::Repeat(_) => [0xF5, 0x9E, 0x0B],
    }
}
