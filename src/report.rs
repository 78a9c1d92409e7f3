//! Static HTML report of the training plan with an embedded weekly-volume
//! chart.

use std::path::Path;

use maud::{Markup, html};

use plotters::prelude::*;

use crate::format::{self, DistanceUnit};
use crate::model::Workout;
use crate::session_types;
use crate::stats;

/// Write the report next to a PNG chart sharing its file stem. The chart is
/// optional: if drawing fails, the report still renders with a placeholder.
pub fn export_plan_report<P: AsRef<Path>>(
    path: P,
    workouts: &[Workout],
    unit: DistanceUnit,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let chart_path = path.with_extension("png");
    let chart_file = match generate_weekly_chart(workouts, unit, &chart_path) {
        Ok(_) => chart_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("")),
        Err(e) => {
            log::error!("Failed to generate report chart: {e}");
            std::ffi::OsStr::new("")
        }
    };
    let markup = build_html(workouts, unit, chart_file);
    std::fs::write(path, markup.into_string())
}

fn generate_weekly_chart(
    workouts: &[Workout],
    unit: DistanceUnit,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let weeks = stats::weekly_volume(workouts);
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;
    if weeks.is_empty() {
        root.present()?;
        return Ok(());
    }
    let max_minutes = weeks
        .iter()
        .map(|w| w.totals.duration_s as f32 / 60.0)
        .fold(0.0_f32, f32::max)
        .max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption("Planned Weekly Duration", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..weeks.len(), 0f32..max_minutes)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc(format!("Minutes ({})", unit.label()))
        .draw()?;
    chart.draw_series(LineSeries::new(
        weeks
            .iter()
            .enumerate()
            .map(|(i, w)| (i, w.totals.duration_s as f32 / 60.0)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}

fn build_html(workouts: &[Workout], unit: DistanceUnit, chart_file: &std::ffi::OsStr) -> Markup {
    let totals = stats::overall_totals(workouts);
    let by_type = stats::totals_by_type(workouts);
    let mut upcoming: Vec<&Workout> = workouts.iter().collect();
    upcoming.sort_by_key(|w| w.date);
    html! {
        html {
            head { meta charset="utf-8"; title { "Training Plan" } }
            body {
                h1 { "Plan Summary" }
                table border="1" {
                    tr { th { "Planned Sessions" } td { (workouts.len()) } }
                    tr { th { "Planned Duration" } td { (format::format_duration(totals.duration_s)) } }
                    tr { th { "Planned Distance" } td { (format::format_distance(totals.distance_m, unit)) } }
                }
                h1 { "Sessions by Type" }
                table border="1" {
                    tr { th { "Type" } th { "Sessions" } th { "Volume" } }
                    @for (t, sessions, tt) in &by_type {
                        tr {
                            td { (session_types::info(*t).label) }
                            td { (sessions) }
                            td { (format::format_totals(*tt, unit)) }
                        }
                    }
                }
                h1 { "Schedule" }
                table border="1" {
                    tr { th { "Date" } th { "Session" } th { "Type" } th { "Volume" } }
                    @for w in &upcoming {
                        tr {
                            td { (format::format_date_display(w.date)) }
                            td { (w.title) @if w.is_ai_generated { " \u{2728}" } }
                            td { (session_types::info(w.workout_type).label) }
                            td { (format::format_totals(crate::segments::totals(&w.segments), unit)) }
                        }
                    }
                }
                h1 { "Weekly Volume" }
                @if chart_file.is_empty() {
                    p { "Chart unavailable" }
                } @else {
                    img src=(chart_file.to_string_lossy());
                }
            }
        }
    }
}
