//! Save the schedule to disk as JSON or as a flattened CSV.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::model::{Intensity, Segment, TargetBasis, Workout};
use crate::session_types;

/// One CSV row per segment; repeats flatten depth-first with their children
/// indented via `depth`.
#[derive(Debug, Serialize, PartialEq)]
pub struct SegmentRow {
    pub workout_id: String,
    pub workout_title: String,
    pub date: String,
    pub session_type: String,
    pub ai_generated: bool,
    pub segment_id: String,
    pub depth: usize,
    pub block: String,
    pub target_basis: String,
    pub target_value: u32,
    pub repeat_count: u32,
    pub intensity: String,
}

fn intensity_text(intensity: &Intensity) -> String {
    match intensity {
        Intensity::None => String::new(),
        Intensity::Pace(b) => format!("pace {}-{} /km", b.min, b.max),
        Intensity::HeartRate(b) => format!("hr {}-{} bpm", b.min, b.max),
    }
}

fn push_rows(workout: &Workout, tree: &[Segment], depth: usize, out: &mut Vec<SegmentRow>) {
    for seg in tree {
        let mut row = SegmentRow {
            workout_id: workout.id.clone(),
            workout_title: workout.title.clone(),
            date: workout.date.format("%Y-%m-%d").to_string(),
            session_type: session_types::info(workout.workout_type).label.to_owned(),
            ai_generated: workout.is_ai_generated,
            segment_id: seg.id().to_owned(),
            depth,
            block: seg.label().to_owned(),
            target_basis: String::new(),
            target_value: 0,
            repeat_count: 0,
            intensity: String::new(),
        };
        match seg {
            Segment::Effort(e) => {
                row.target_basis = match e.basis {
                    TargetBasis::Time => "time".to_owned(),
                    TargetBasis::Distance => "distance".to_owned(),
                };
                row.target_value = e.target;
                row.intensity = intensity_text(&e.intensity);
                out.push(row);
            }
            Segment::Repeat(r) => {
                row.repeat_count = r.count;
                out.push(row);
                push_rows(workout, &r.children, depth + 1, out);
            }
        }
    }
}

/// Flatten every workout into CSV rows, one per segment.
pub fn flatten_rows(workouts: &[Workout]) -> Vec<SegmentRow> {
    let mut rows = Vec::new();
    for w in workouts {
        push_rows(w, &w.segments, 0, &mut rows);
    }
    rows
}

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_schedule_json<P: AsRef<Path>>(path: P, workouts: &[Workout]) -> std::io::Result<()> {
    write_json(workouts, path)
}

pub fn save_schedule_csv<P: AsRef<Path>>(path: P, workouts: &[Workout]) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &flatten_rows(workouts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::seed_workouts;
    use crate::segments;

    #[test]
    fn flatten_emits_one_row_per_segment() {
        let workouts = seed_workouts();
        let rows = flatten_rows(&workouts);
        let expected: usize = workouts.iter().map(|w| segments::count(&w.segments)).sum();
        assert_eq!(rows.len(), expected);
    }

    #[test]
    fn flatten_marks_repeat_children_depth() {
        let workouts = seed_workouts();
        let rows = flatten_rows(&workouts);
        let vma_rows: Vec<&SegmentRow> = rows
            .iter()
            .filter(|r| r.workout_title == "Short VMA Session")
            .collect();
        // warm-up, repeat, 2 children, cool-down
        assert_eq!(vma_rows.len(), 5);
        assert_eq!(vma_rows[1].block, "Repeat");
        assert_eq!(vma_rows[1].repeat_count, 15);
        assert_eq!(vma_rows[2].depth, 1);
        assert_eq!(vma_rows[2].intensity, "pace 3:20-3:30 /km");
    }

    #[test]
    fn csv_serializes_rows() {
        let workouts = seed_workouts();
        let mut buf = Vec::new();
        write_csv(&mut buf, &flatten_rows(&workouts)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("workout_id,workout_title,date,"));
        assert!(text.contains("Short VMA Session"));
    }

    #[test]
    fn json_roundtrips_workouts() {
        let workouts = seed_workouts();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        save_schedule_json(&path, &workouts).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let back: Vec<crate::model::Workout> = serde_json::from_str(&data).unwrap();
        assert_eq!(back, workouts);
    }
}
