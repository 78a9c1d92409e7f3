//! Desktop training planner for runners: calendar, schedule, session
//! builder with nested interval segments, stubbed AI coach, and planned
//! volume stats.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui::{Color32, RichText};
use egui_extras::DatePickerButton;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, NaiveDate};
use log::info;

mod calendar;
mod capture;
mod coach;
mod export;
mod format;
mod mock_data;
mod model;
mod report;
mod segments;
mod session_types;
mod stats;
mod store;
mod update_check;

use coach::{ALL_FOCUSES, PendingSuggestion};
use format::DistanceUnit;
use model::{ALL_WORKOUT_TYPES, EffortKind, Intensity, IntensityBounds, Segment, TargetBasis,
    Workout, WorkoutType};
use store::{DraftSegments, WorkoutStore};

const TOAST_DURATION: Duration = Duration::from_secs(3);

fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Schedule filter: substring match first, fuzzy fallback for typos.
fn title_matches(query: &str, title: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let title = title.to_lowercase();
    title.contains(&query) || strsim::jaro_winkler(&query, &title) >= 0.8
}

/// Persistent user preferences. Workout data itself is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    distance_unit: DistanceUnit,
    default_session_type: WorkoutType,
    #[serde(default = "default_true")]
    show_stats_tab: bool,
    #[serde(default)]
    check_updates: bool,
    #[serde(default)]
    update_repo: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Settings {
    const FILE: &'static str = "stride_planner_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(cfg) = serde_json::from_str(&data) {
                    return cfg;
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(data) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, data);
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            distance_unit: DistanceUnit::Kilometers,
            default_session_type: WorkoutType::Endurance,
            show_stats_tab: true,
            check_updates: false,
            update_repo: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Calendar,
    Schedule,
    Coach,
    Stats,
}

/// Form state for the "new session" window.
struct BuilderForm {
    title: String,
    description: String,
    date: NaiveDate,
    workout_type: WorkoutType,
    error: Option<String>,
}

impl BuilderForm {
    fn new(workout_type: WorkoutType) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: Local::now().date_naive(),
            workout_type,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntensityChoice {
    None,
    Pace,
    HeartRate,
}

/// Text-buffer state for the segment editor window. Fields are validated
/// on save; invalid input never reaches the draft tree.
struct SegmentEditor {
    id: String,
    is_repeat: bool,
    minutes: String,
    seconds: String,
    distance: String,
    basis: TargetBasis,
    intensity: IntensityChoice,
    bound_min: String,
    bound_max: String,
    count: String,
    error: Option<String>,
}

impl SegmentEditor {
    fn open(segment: &Segment, unit: DistanceUnit) -> Self {
        let mut editor = Self {
            id: segment.id().to_owned(),
            is_repeat: segment.is_repeat(),
            minutes: String::new(),
            seconds: String::new(),
            distance: String::new(),
            basis: TargetBasis::Time,
            intensity: IntensityChoice::None,
            bound_min: String::new(),
            bound_max: String::new(),
            count: String::new(),
            error: None,
        };
        match segment {
            Segment::Effort(e) => {
                editor.basis = e.basis;
                match e.basis {
                    TargetBasis::Time => {
                        let (mins, secs) = format::split_minutes_seconds(e.target);
                        editor.minutes = mins.to_string();
                        editor.seconds = secs.to_string();
                    }
                    TargetBasis::Distance => {
                        let value = e.target as f64
                            / match unit {
                                DistanceUnit::Kilometers => 1000.0,
                                DistanceUnit::Miles => 1609.344,
                            };
                        editor.distance = format!("{value:.2}");
                    }
                }
                match &e.intensity {
                    Intensity::None => {}
                    Intensity::Pace(b) => {
                        editor.intensity = IntensityChoice::Pace;
                        editor.bound_min = b.min.clone();
                        editor.bound_max = b.max.clone();
                    }
                    Intensity::HeartRate(b) => {
                        editor.intensity = IntensityChoice::HeartRate;
                        editor.bound_min = b.min.clone();
                        editor.bound_max = b.max.clone();
                    }
                }
            }
            Segment::Repeat(r) => {
                editor.count = r.count.to_string();
            }
        }
        editor
    }

    fn parsed_intensity(&self) -> Result<Intensity, String> {
        let bounds = IntensityBounds {
            min: self.bound_min.trim().to_owned(),
            max: self.bound_max.trim().to_owned(),
        };
        match self.intensity {
            IntensityChoice::None => Ok(Intensity::None),
            IntensityChoice::Pace => {
                if format::is_valid_pace(&bounds.min) && format::is_valid_pace(&bounds.max) {
                    Ok(Intensity::Pace(bounds))
                } else {
                    Err("Pace bounds must be mm:ss".to_owned())
                }
            }
            IntensityChoice::HeartRate => {
                format::parse_whole(&bounds.min)
                    .and(format::parse_whole(&bounds.max))
                    .map_err(|e| format!("Heart rate bounds: {e}"))?;
                Ok(Intensity::HeartRate(bounds))
            }
        }
    }

    /// Validate the buffers and produce the edited segment, keeping the
    /// identity and structure of `current`.
    fn apply_to(&self, current: &Segment, unit: DistanceUnit) -> Result<Segment, String> {
        match current {
            Segment::Repeat(r) => {
                let count =
                    format::parse_count(&self.count).map_err(|e| format!("Repetitions: {e}"))?;
                let mut r = r.clone();
                r.count = count;
                Ok(Segment::Repeat(r))
            }
            Segment::Effort(e) => {
                let mut e = e.clone();
                e.basis = self.basis;
                e.target = match self.basis {
                    TargetBasis::Time => {
                        let mins = format::parse_whole(&self.minutes)
                            .map_err(|err| format!("Minutes: {err}"))?;
                        let secs = format::parse_whole(&self.seconds)
                            .map_err(|err| format!("Seconds: {err}"))?;
                        mins * 60 + secs
                    }
                    TargetBasis::Distance => format::parse_distance(&self.distance, unit)
                        .map_err(|err| format!("Distance: {err}"))?,
                };
                e.intensity = self.parsed_intensity()?;
                Ok(Segment::Effort(e))
            }
        }
    }
}

/// What the user asked for while a segment list was being drawn.
enum SegmentAction {
    Edit(String),
    Remove(String),
}

struct PlannerApp {
    store: WorkoutStore,
    draft: DraftSegments,
    settings: Settings,
    settings_dirty: bool,
    tab: Tab,
    shown_month: (i32, u32),
    schedule_filter: String,
    detail_workout: Option<String>,
    day_view: Option<NaiveDate>,
    show_builder: bool,
    builder: BuilderForm,
    editor: Option<SegmentEditor>,
    show_settings: bool,
    show_about: bool,
    pending_suggestion: Option<PendingSuggestion>,
    suggestion: Option<Workout>,
    toast: Option<(String, Instant)>,
    capture_rect: Option<egui::Rect>,
    update_notice: Option<String>,
}

impl Default for PlannerApp {
    fn default() -> Self {
        let settings = Settings::load();
        let today = Local::now().date_naive();
        let mut app = Self {
            store: WorkoutStore::seeded(),
            draft: DraftSegments::default(),
            builder: BuilderForm::new(settings.default_session_type),
            settings,
            settings_dirty: false,
            tab: Tab::Calendar,
            shown_month: (today.year(), today.month()),
            schedule_filter: String::new(),
            detail_workout: None,
            day_view: None,
            show_builder: false,
            editor: None,
            show_settings: false,
            show_about: false,
            pending_suggestion: None,
            suggestion: None,
            toast: None,
            capture_rect: None,
            update_notice: None,
        };

        if app.settings.check_updates {
            if let Some(repo) = app.settings.update_repo.clone() {
                if let Some(tag) = update_check::check_for_update(&repo, env!("CARGO_PKG_VERSION"))
                {
                    app.update_notice = Some(format!("Release {tag} is available"));
                }
            }
        }

        app
    }
}

impl PlannerApp {
    fn toast(&mut self, message: impl Into<String>) {
        self.toast = Some((message.into(), Instant::now()));
    }

    fn open_builder(&mut self) {
        self.draft.clear();
        self.builder = BuilderForm::new(self.settings.default_session_type);
        self.editor = None;
        self.show_builder = true;
    }

    /// Validate and commit the builder form into the store.
    fn commit_builder(&mut self) {
        if self.builder.title.trim().is_empty() {
            self.builder.error = Some("A session needs a title".to_owned());
            return;
        }
        let mut workout = Workout::new(
            self.builder.title.trim(),
            self.builder.description.trim(),
            self.builder.date,
            self.builder.workout_type,
        );
        workout.segments = self.draft.take();
        let title = workout.title.clone();
        self.store.add(workout);
        self.show_builder = false;
        self.editor = None;
        self.builder = BuilderForm::new(self.settings.default_session_type);
        self.toast(format!("'{title}' added to the schedule"));
    }

    fn discard_builder(&mut self) {
        self.draft.clear();
        self.editor = None;
        self.show_builder = false;
    }

    /// Insert a fresh segment into the draft and jump to its editor.
    fn add_draft_segment(&mut self, segment: Segment) {
        let id = segment.id().to_owned();
        match self.draft.insert(segment) {
            Ok(()) => {
                if let Some(seg) = self.draft.find(&id) {
                    self.editor = Some(SegmentEditor::open(seg, self.settings.distance_unit));
                }
            }
            Err(e) => self.toast(e.to_string()),
        }
    }

    /// Save the open editor back into the draft. Returns false when the
    /// buffers fail validation.
    fn save_editor(&mut self) -> bool {
        let Some(editor) = &mut self.editor else {
            return true;
        };
        let Some(current) = self.draft.find(&editor.id).cloned() else {
            // Segment was removed behind the editor; nothing to save.
            return true;
        };
        match editor.apply_to(&current, self.settings.distance_unit) {
            Ok(updated) => {
                self.draft.replace(&updated);
                true
            }
            Err(message) => {
                editor.error = Some(message);
                false
            }
        }
    }

    fn ui_toast_bar(&mut self, ui: &mut egui::Ui) {
        if let Some((message, _)) = &self.toast {
            ui.colored_label(Color32::from_rgb(0x10, 0xB9, 0x81), message);
        }
        if let Some(notice) = self.update_notice.clone() {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::from_rgb(0xF5, 0x9E, 0x0B), &notice);
                if ui.small_button("Dismiss").clicked() {
                    self.update_notice = None;
                }
            });
        }
    }

    fn workout_marker_text(&self, workout: &Workout) -> String {
        let totals = segments::totals(&workout.segments);
        format::format_totals(totals, self.settings.distance_unit)
    }

    fn ui_calendar(&mut self, ui: &mut egui::Ui) {
        let (year, month) = self.shown_month;
        ui.horizontal(|ui| {
            if ui.button("\u{25C0}").clicked() {
                self.shown_month = calendar::prev_month(year, month);
            }
            ui.heading(calendar::month_label(year, month));
            if ui.button("\u{25B6}").clicked() {
                self.shown_month = calendar::next_month(year, month);
            }
            if ui.button("Today").clicked() {
                let today = Local::now().date_naive();
                self.shown_month = (today.year(), today.month());
            }
        });
        ui.separator();

        let grid = calendar::month_grid(self.shown_month.0, self.shown_month.1);
        let today = Local::now().date_naive();
        let mut open_day: Option<NaiveDate> = None;
        let mut open_detail: Option<String> = None;

        egui::Grid::new("month_grid")
            .num_columns(7)
            .min_col_width(110.0)
            .show(ui, |ui| {
                for name in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
                    ui.label(RichText::new(name).weak());
                }
                ui.end_row();
                for week in &grid.weeks {
                    for cell in week {
                        match cell {
                            None => {
                                ui.label("");
                            }
                            Some(date) => {
                                ui.vertical(|ui| {
                                    let day_text = if *date == today {
                                        RichText::new(date.day().to_string())
                                            .strong()
                                            .color(Color32::from_rgb(0x00, 0x66, 0xFF))
                                    } else {
                                        RichText::new(date.day().to_string())
                                    };
                                    let day_workouts = self.store.by_date(*date);
                                    if ui.add(egui::Button::new(day_text).frame(false)).clicked()
                                        && !day_workouts.is_empty()
                                    {
                                        open_day = Some(*date);
                                    }
                                    for w in day_workouts {
                                        let info = session_types::info(w.workout_type);
                                        let marker = format!(
                                            "{} {}",
                                            info.short,
                                            self.workout_marker_text(w)
                                        );
                                        let label = RichText::new(marker)
                                            .small()
                                            .color(Color32::WHITE)
                                            .background_color(rgb(info.color));
                                        if ui
                                            .add(egui::Label::new(label).sense(egui::Sense::click()))
                                            .clicked()
                                        {
                                            open_detail = Some(w.id.clone());
                                        }
                                    }
                                });
                            }
                        }
                    }
                    ui.end_row();
                }
            });

        if let Some(date) = open_day {
            self.day_view = Some(date);
        }
        if let Some(id) = open_detail {
            self.detail_workout = Some(id);
        }
    }

    fn workout_card(&self, ui: &mut egui::Ui, workout: &Workout) -> bool {
        let info = session_types::info(workout.workout_type);
        let mut clicked = false;
        egui::Frame::none()
            .fill(ui.visuals().faint_bg_color)
            .stroke(egui::Stroke::new(1.0, rgb(info.color)))
            .rounding(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(info.short).strong().color(rgb(info.color)));
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&workout.title).strong());
                            if workout.is_ai_generated {
                                ui.label(RichText::new("\u{2728} AI").small());
                            }
                        });
                        ui.label(
                            RichText::new(format!(
                                "{} \u{2022} {}",
                                format::format_date_display(workout.date),
                                self.workout_marker_text(workout)
                            ))
                            .weak(),
                        );
                    });
                });
                clicked = ui
                    .interact(
                        ui.min_rect(),
                        ui.id().with(&workout.id),
                        egui::Sense::click(),
                    )
                    .clicked();
            });
        clicked
    }

    fn ui_schedule(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Filter:");
            ui.text_edit_singleline(&mut self.schedule_filter);
            if ui.button("\u{FF0B} New session").clicked() {
                self.open_builder();
            }
        });
        ui.separator();
        ui.label(RichText::new("Upcoming sessions").weak());

        let mut open_detail: Option<String> = None;
        let visible: Vec<Workout> = self
            .store
            .sorted_by_date()
            .into_iter()
            .filter(|w| title_matches(&self.schedule_filter, &w.title))
            .cloned()
            .collect();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if visible.is_empty() {
                ui.label("No sessions planned yet.");
            }
            for workout in &visible {
                if self.workout_card(ui, workout) {
                    open_detail = Some(workout.id.clone());
                }
            }
        });
        if let Some(id) = open_detail {
            self.detail_workout = Some(id);
        }
    }

    fn ui_coach(&mut self, ui: &mut egui::Ui) {
        ui.heading("\u{2728} AI Running Coach");
        ui.label("Choose a session type to generate a training suggestion.");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            for focus in ALL_FOCUSES {
                let generating = self.pending_suggestion.is_some();
                if ui
                    .add_enabled(!generating, egui::Button::new(focus.label()))
                    .clicked()
                {
                    self.suggestion = None;
                    self.pending_suggestion = Some(PendingSuggestion::new(focus));
                }
            }
        });
        ui.add_space(12.0);

        if self.pending_suggestion.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Generating your session...");
            });
        } else if let Some(suggestion) = self.suggestion.clone() {
            ui.label(RichText::new("Your personalized suggestion").strong());
            self.workout_card(ui, &suggestion);
            ui.horizontal(|ui| {
                if ui.button("Add to calendar").clicked() {
                    let title = suggestion.title.clone();
                    self.store.add(suggestion);
                    self.suggestion = None;
                    self.toast(format!("'{title}' added to the schedule"));
                }
                if ui.button("Discard").clicked() {
                    self.suggestion = None;
                }
            });
        } else {
            ui.label(RichText::new("Tap a session type above to get started.").weak());
        }
    }

    fn ui_stats(&mut self, ui: &mut egui::Ui) {
        let workouts = self.store.list();
        let unit = self.settings.distance_unit;
        let totals = stats::overall_totals(workouts);
        ui.horizontal(|ui| {
            ui.label(format!("{} planned sessions", workouts.len()));
            ui.separator();
            ui.label(format!("Total volume: {}", format::format_totals(totals, unit)));
        });
        ui.separator();

        egui::Grid::new("type_totals").striped(true).show(ui, |ui| {
            ui.label(RichText::new("Type").strong());
            ui.label(RichText::new("Sessions").strong());
            ui.label(RichText::new("Volume").strong());
            ui.end_row();
            for (t, sessions, tt) in stats::totals_by_type(workouts) {
                let info = session_types::info(t);
                ui.colored_label(rgb(info.color), info.label);
                ui.label(sessions.to_string());
                ui.label(format::format_totals(tt, unit));
                ui.end_row();
            }
        });
        ui.separator();

        let weeks = stats::weekly_volume(workouts);
        let duration_points: Vec<[f64; 2]> = weeks
            .iter()
            .map(|w| {
                [
                    w.week_start.num_days_from_ce() as f64,
                    w.totals.duration_s as f64 / 60.0,
                ]
            })
            .collect();
        let resp = Plot::new("weekly_volume")
            .height(240.0)
            .x_axis_formatter(|mark, _chars, _| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%d/%m").to_string())
                    .unwrap_or_else(|| format!("{:.0}", mark.value))
            })
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(duration_points)).name("Planned minutes / week"),
                );
            });

        if ui.button("Save plot PNG").clicked() {
            self.capture_rect = Some(resp.response.rect);
            ui.ctx()
                .send_viewport_cmd(egui::ViewportCommand::Screenshot);
        }
    }

    /// Recursive segment rows shared by the builder and the detail view.
    fn draw_segment_tree(
        ui: &mut egui::Ui,
        tree: &[Segment],
        depth: usize,
        unit: DistanceUnit,
        editable: bool,
        actions: &mut Vec<SegmentAction>,
    ) {
        for seg in tree {
            ui.horizontal(|ui| {
                ui.add_space(12.0 * depth as f32);
                let color = rgb(session_types::segment_color(seg));
                ui.label(RichText::new(seg.label()).strong().color(color));
                match seg {
                    Segment::Effort(e) => {
                        let target = match e.basis {
                            TargetBasis::Time => format::format_duration(e.target),
                            TargetBasis::Distance => format::format_distance(e.target, unit),
                        };
                        ui.label(target);
                        match &e.intensity {
                            Intensity::None => {}
                            Intensity::Pace(b) => {
                                ui.label(
                                    RichText::new(format!("{}-{} /km", b.min, b.max)).weak(),
                                );
                            }
                            Intensity::HeartRate(b) => {
                                ui.label(
                                    RichText::new(format!("{}-{} bpm", b.min, b.max)).weak(),
                                );
                            }
                        }
                    }
                    Segment::Repeat(r) => {
                        ui.label(format!("{}x", r.count));
                        ui.label(
                            RichText::new(format!("{} elements", r.children.len())).weak(),
                        );
                    }
                }
                if editable {
                    if ui.small_button("Edit").clicked() {
                        actions.push(SegmentAction::Edit(seg.id().to_owned()));
                    }
                    if ui.small_button("\u{1F5D1}").clicked() {
                        actions.push(SegmentAction::Remove(seg.id().to_owned()));
                    }
                }
            });
            if let Segment::Repeat(r) = seg {
                Self::draw_segment_tree(ui, &r.children, depth + 1, unit, editable, actions);
            }
        }
    }

    fn window_builder(&mut self, ctx: &egui::Context) {
        if !self.show_builder {
            return;
        }
        let mut open = true;
        let mut commit = false;
        let mut discard = false;
        let mut actions: Vec<SegmentAction> = Vec::new();
        let mut add_segment: Option<Segment> = None;
        egui::Window::new("New Session")
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut self.builder.title);
                ui.label("Description");
                ui.text_edit_multiline(&mut self.builder.description);
                ui.horizontal(|ui| {
                    ui.label("Date:");
                    ui.add(DatePickerButton::new(&mut self.builder.date));
                });
                ui.label("Session type");
                ui.horizontal_wrapped(|ui| {
                    for t in ALL_WORKOUT_TYPES {
                        let info = session_types::info(t);
                        ui.selectable_value(&mut self.builder.workout_type, t, info.label)
                            .on_hover_text(info.blurb);
                    }
                });
                ui.separator();

                ui.label(RichText::new("Segments").strong());
                if self.draft.is_empty() {
                    ui.label(RichText::new("No segments yet.").weak());
                } else {
                    Self::draw_segment_tree(
                        ui,
                        self.draft.segments(),
                        0,
                        self.settings.distance_unit,
                        true,
                        &mut actions,
                    );
                }
                ui.horizontal(|ui| {
                    ui.label("Add:");
                    if ui.button("Warm-up").clicked() {
                        add_segment = Some(Segment::new_effort(EffortKind::Warmup));
                    }
                    if ui.button("Run").clicked() {
                        add_segment = Some(Segment::new_effort(EffortKind::Run));
                    }
                    if ui.button("Recovery").clicked() {
                        add_segment = Some(Segment::new_effort(EffortKind::Recovery));
                    }
                    if ui.button("Repeat").clicked() {
                        add_segment = Some(Segment::new_repeat());
                    }
                    if ui.button("Cool-down").clicked() {
                        add_segment = Some(Segment::new_effort(EffortKind::Cooldown));
                    }
                });
                ui.label(
                    RichText::new(format!(
                        "Planned: {}",
                        format::format_totals(self.draft.totals(), self.settings.distance_unit)
                    ))
                    .weak(),
                );
                if let Some(error) = &self.builder.error {
                    ui.colored_label(Color32::RED, error);
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Create session").clicked() {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        discard = true;
                    }
                });
            });

        for action in actions {
            match action {
                SegmentAction::Edit(id) => {
                    if let Some(seg) = self.draft.find(&id) {
                        self.editor = Some(SegmentEditor::open(seg, self.settings.distance_unit));
                    }
                }
                SegmentAction::Remove(id) => {
                    if self.editor.as_ref().is_some_and(|e| e.id == id) {
                        self.editor = None;
                    }
                    self.draft.remove(&id);
                }
            }
        }
        if let Some(segment) = add_segment {
            self.add_draft_segment(segment);
        }
        if commit {
            self.commit_builder();
        }
        if discard || !open {
            self.discard_builder();
        }
    }

    fn window_segment_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = &self.editor else {
            return;
        };
        let editor_id = editor.id.clone();
        let Some(current) = self.draft.find(&editor_id).cloned() else {
            self.editor = None;
            return;
        };
        let depth = self.draft.depth_of(&editor_id).unwrap_or(0);
        let unit = self.settings.distance_unit;
        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        let mut add_child: Option<Segment> = None;
        let mut child_actions: Vec<SegmentAction> = Vec::new();

        let title = format!("Edit {}", current.label().to_lowercase());
        if let Some(editor) = &mut self.editor {
            egui::Window::new(title)
                .open(&mut open)
                .default_width(320.0)
                .show(ctx, |ui| {
                    if editor.is_repeat {
                        ui.label("Repetitions");
                        ui.text_edit_singleline(&mut editor.count);
                        if let Segment::Repeat(r) = &current {
                            if !r.children.is_empty() {
                                ui.label(RichText::new("Contained elements").strong());
                                Self::draw_segment_tree(
                                    ui,
                                    &r.children,
                                    0,
                                    unit,
                                    true,
                                    &mut child_actions,
                                );
                            }
                        }
                        ui.horizontal(|ui| {
                            ui.label("Add to this repeat:");
                            if ui.button("Run").clicked() {
                                add_child = Some(Segment::new_effort(EffortKind::Run));
                            }
                            if ui.button("Recovery").clicked() {
                                add_child = Some(Segment::new_effort(EffortKind::Recovery));
                            }
                            if segments::can_nest_repeat(depth) && ui.button("Repeat").clicked() {
                                add_child = Some(Segment::new_repeat());
                            }
                        });
                    } else {
                        ui.label("Work target");
                        ui.horizontal(|ui| {
                            ui.selectable_value(&mut editor.basis, TargetBasis::Time, "\u{23F1} Duration");
                            ui.selectable_value(
                                &mut editor.basis,
                                TargetBasis::Distance,
                                "\u{1F4CD} Distance",
                            );
                        });
                        match editor.basis {
                            TargetBasis::Time => {
                                ui.horizontal(|ui| {
                                    ui.label("Minutes");
                                    ui.add(
                                        egui::TextEdit::singleline(&mut editor.minutes)
                                            .desired_width(50.0),
                                    );
                                    ui.label("Seconds");
                                    ui.add(
                                        egui::TextEdit::singleline(&mut editor.seconds)
                                            .desired_width(50.0),
                                    );
                                });
                            }
                            TargetBasis::Distance => {
                                ui.horizontal(|ui| {
                                    ui.label(format!("Distance ({})", unit.label()));
                                    ui.add(
                                        egui::TextEdit::singleline(&mut editor.distance)
                                            .desired_width(70.0),
                                    );
                                });
                            }
                        }
                        ui.label("Intensity target");
                        ui.horizontal(|ui| {
                            ui.selectable_value(&mut editor.intensity, IntensityChoice::None, "None");
                            ui.selectable_value(&mut editor.intensity, IntensityChoice::Pace, "Pace");
                            ui.selectable_value(
                                &mut editor.intensity,
                                IntensityChoice::HeartRate,
                                "Heart rate",
                            );
                        });
                        if editor.intensity != IntensityChoice::None {
                            ui.horizontal(|ui| {
                                ui.label("Min");
                                ui.add(
                                    egui::TextEdit::singleline(&mut editor.bound_min)
                                        .desired_width(60.0),
                                );
                                ui.label("Max");
                                ui.add(
                                    egui::TextEdit::singleline(&mut editor.bound_max)
                                        .desired_width(60.0),
                                );
                            });
                        }
                    }
                    if let Some(error) = &editor.error {
                        ui.colored_label(Color32::RED, error);
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            save = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });
        }

        for action in child_actions {
            match action {
                SegmentAction::Edit(id) => {
                    if self.save_editor() {
                        if let Some(seg) = self.draft.find(&id) {
                            self.editor =
                                Some(SegmentEditor::open(seg, self.settings.distance_unit));
                        }
                    }
                    return;
                }
                SegmentAction::Remove(id) => {
                    self.draft.remove(&id);
                }
            }
        }
        if let Some(child) = add_child {
            // Persist the count edit before descending into the child.
            if self.save_editor() {
                let child_id = child.id().to_owned();
                match self.draft.add_child(&editor_id, child) {
                    Ok(()) => {
                        if let Some(seg) = self.draft.find(&child_id) {
                            self.editor =
                                Some(SegmentEditor::open(seg, self.settings.distance_unit));
                        }
                    }
                    Err(e) => self.toast(e.to_string()),
                }
            }
            return;
        }
        if save {
            if self.save_editor() {
                self.editor = None;
            }
        } else if cancel || !open {
            self.editor = None;
        }
    }

    fn window_detail(&mut self, ctx: &egui::Context) {
        let Some(id) = self.detail_workout.clone() else {
            return;
        };
        let mut open = true;
        let unit = self.settings.distance_unit;
        let workout = self.store.by_id(&id).cloned();
        egui::Window::new("Session")
            .open(&mut open)
            .default_width(380.0)
            .show(ctx, |ui| {
                let Some(workout) = workout else {
                    // Lookup miss renders a not-found view instead of crashing.
                    ui.label("Session not found.");
                    return;
                };
                let info = session_types::info(workout.workout_type);
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&workout.title).color(rgb(info.color)));
                    if workout.is_ai_generated {
                        ui.label(RichText::new("\u{2728} AI suggested").small());
                    }
                });
                ui.label(RichText::new(info.label).weak())
                    .on_hover_text(info.blurb);
                ui.separator();
                if !workout.description.is_empty() {
                    ui.label(&workout.description);
                }
                ui.horizontal(|ui| {
                    ui.label(format!("Date: {}", format::format_date_display(workout.date)));
                    ui.separator();
                    ui.label(format!(
                        "Planned: {}",
                        format::format_totals(segments::totals(&workout.segments), unit)
                    ));
                });
                ui.separator();
                if workout.segments.is_empty() {
                    ui.label(RichText::new("No details for this session.").weak());
                } else {
                    let mut no_actions = Vec::new();
                    Self::draw_segment_tree(
                        ui,
                        &workout.segments,
                        0,
                        unit,
                        false,
                        &mut no_actions,
                    );
                }
            });
        if !open {
            self.detail_workout = None;
        }
    }

    fn window_day(&mut self, ctx: &egui::Context) {
        let Some(date) = self.day_view else {
            return;
        };
        let mut open = true;
        let mut open_detail: Option<String> = None;
        let day_workouts: Vec<Workout> =
            self.store.by_date(date).into_iter().cloned().collect();
        egui::Window::new(format!("Sessions on {}", format::format_date_display(date)))
            .open(&mut open)
            .show(ctx, |ui| {
                if day_workouts.is_empty() {
                    ui.label("No sessions planned for this day.");
                }
                for workout in &day_workouts {
                    if self.workout_card(ui, workout) {
                        open_detail = Some(workout.id.clone());
                    }
                }
            });
        if let Some(id) = open_detail {
            self.detail_workout = Some(id);
        }
        if !open {
            self.day_view = None;
        }
    }

    fn window_settings(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = true;
        egui::Window::new("Settings").open(&mut open).show(ctx, |ui| {
            ui.label("Distance unit");
            ui.horizontal(|ui| {
                for unit in [DistanceUnit::Kilometers, DistanceUnit::Miles] {
                    if ui
                        .selectable_value(&mut self.settings.distance_unit, unit, unit.label())
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                }
            });
            ui.label("Default session type");
            ui.horizontal_wrapped(|ui| {
                for t in ALL_WORKOUT_TYPES {
                    if ui
                        .selectable_value(
                            &mut self.settings.default_session_type,
                            t,
                            session_types::info(t).label,
                        )
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                }
            });
            if ui
                .checkbox(&mut self.settings.show_stats_tab, "Show stats tab")
                .changed()
            {
                self.settings_dirty = true;
            }
            if ui
                .checkbox(&mut self.settings.check_updates, "Check for updates on start")
                .changed()
            {
                self.settings_dirty = true;
            }
            if self.settings.check_updates {
                let mut repo = self.settings.update_repo.clone().unwrap_or_default();
                ui.horizontal(|ui| {
                    ui.label("GitHub repo:");
                    if ui.text_edit_singleline(&mut repo).changed() {
                        self.settings.update_repo =
                            if repo.is_empty() { None } else { Some(repo.clone()) };
                        self.settings_dirty = true;
                    }
                });
            }
        });
        if !open {
            self.show_settings = false;
        }
    }

    fn window_about(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }
        let mut open = true;
        egui::Window::new("About").open(&mut open).show(ctx, |ui| {
            ui.label(format!("Stride Planner {}", env!("CARGO_PKG_VERSION")));
            ui.label("Plan running sessions with nested interval segments.");
            ui.label("All data lives in memory and resets on restart.");
        });
        if !open {
            self.show_about = false;
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Session").clicked() {
                        self.open_builder();
                        ui.close_menu();
                    }
                    if ui.button("Export Schedule").clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .add_filter("CSV", &["csv"])
                            .save_file()
                        {
                            let result = match path
                                .extension()
                                .and_then(|e| e.to_str())
                                .map(|s| s.to_lowercase())
                            {
                                Some(ext) if ext == "csv" => {
                                    export::save_schedule_csv(&path, self.store.list())
                                        .map_err(|e| e.to_string())
                                }
                                _ => export::save_schedule_json(&path, self.store.list())
                                    .map_err(|e| e.to_string()),
                            };
                            match result {
                                Ok(()) => self.toast("Schedule exported"),
                                Err(e) => {
                                    log::error!("Failed to export schedule: {e}");
                                    self.toast("Export failed");
                                }
                            }
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export Plan Report").clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("HTML", &["html"])
                            .save_file()
                        {
                            match report::export_plan_report(
                                &path,
                                self.store.list(),
                                self.settings.distance_unit,
                            ) {
                                Ok(()) => {
                                    self.toast("Report exported");
                                    if let Err(e) = open::that(&path) {
                                        log::warn!("Could not open report: {e}");
                                    }
                                }
                                Err(e) => {
                                    log::error!("Failed to export report: {e}");
                                    self.toast("Report export failed");
                                }
                            }
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

impl App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Handle screenshot results for the stats plot capture.
        let mut shot: Option<std::sync::Arc<egui::ColorImage>> = None;
        ctx.input_mut(|i| {
            i.events.retain(|e| {
                if let egui::Event::Screenshot { image, .. } = e {
                    shot = Some(image.clone());
                    false
                } else {
                    true
                }
            });
        });
        if let Some(image) = shot {
            if let Some(rect) = self.capture_rect.take() {
                if let Some(path) = FileDialog::new().add_filter("PNG", &["png"]).save_file() {
                    if let Err(e) =
                        capture::save_region_png(&image, rect, ctx.pixels_per_point(), &path)
                    {
                        log::error!("Failed to save plot: {e}");
                        self.toast("Could not save plot");
                    } else {
                        self.toast("Plot saved");
                    }
                }
            }
        }

        // A pending coach request fires after its fixed delay; when the
        // user has left the coach tab the result is dropped.
        if let Some(pending) = &self.pending_suggestion {
            if pending.ready() {
                let focus = pending.focus;
                self.pending_suggestion = None;
                if self.tab == Tab::Coach {
                    let today = Local::now().date_naive();
                    self.suggestion = Some(coach::build_suggestion(focus, today));
                    info!("Generated {} suggestion", focus.label());
                }
            } else {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
        }

        if let Some((_, started)) = &self.toast {
            if started.elapsed() > TOAST_DURATION {
                self.toast = None;
            } else {
                ctx.request_repaint_after(Duration::from_millis(250));
            }
        }

        self.menu_bar(ctx);

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Calendar, "\u{1F4C5} Calendar");
                ui.selectable_value(&mut self.tab, Tab::Schedule, "\u{1F4CB} Schedule");
                ui.selectable_value(&mut self.tab, Tab::Coach, "\u{2728} Coach");
                if self.settings.show_stats_tab {
                    ui.selectable_value(&mut self.tab, Tab::Stats, "\u{1F4C8} Stats");
                }
            });
            self.ui_toast_bar(ui);
        });

        if !self.settings.show_stats_tab && self.tab == Tab::Stats {
            self.tab = Tab::Calendar;
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Calendar => self.ui_calendar(ui),
            Tab::Schedule => self.ui_schedule(ui),
            Tab::Coach => self.ui_coach(ui),
            Tab::Stats => self.ui_stats(ui),
        });

        self.window_builder(ctx);
        self.window_segment_editor(ctx);
        self.window_detail(ctx);
        self.window_day(ctx);
        self.window_settings(ctx);
        self.window_about(ctx);

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "Stride Planner",
        options,
        Box::new(|_cc| Box::new(PlannerApp::default())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn with_temp_config<R>(f: impl FnOnce() -> R) -> R {
        use std::env;
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }
        let out = f();
        if let Some(val) = prev {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
        out
    }

    #[test]
    fn settings_roundtrip() {
        let mut s = Settings::default();
        s.distance_unit = DistanceUnit::Miles;
        s.default_session_type = WorkoutType::Threshold;
        s.show_stats_tab = false;
        s.check_updates = true;
        s.update_repo = Some("user/repo".into());

        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn settings_missing_fields_default() {
        let loaded: Settings = serde_json::from_str(
            r#"{"distance_unit":"Kilometers","default_session_type":"Endurance"}"#,
        )
        .unwrap();
        assert!(loaded.show_stats_tab);
        assert!(!loaded.check_updates);
        assert!(loaded.update_repo.is_none());
    }

    #[test]
    fn settings_persist_to_config_dir() {
        with_temp_config(|| {
            let mut s = Settings::default();
            s.distance_unit = DistanceUnit::Miles;
            s.save();
            let loaded = Settings::load();
            assert_eq!(loaded.distance_unit, DistanceUnit::Miles);
        });
    }

    #[test]
    fn title_filter_matches_substrings_and_typos() {
        assert!(title_matches("", "Threshold Blocks"));
        assert!(title_matches("thresh", "Threshold Blocks"));
        assert!(title_matches("Threshold Block", "Threshold Blocks"));
        assert!(!title_matches("sprint", "Threshold Blocks"));
    }

    #[test]
    fn commit_builder_requires_title() {
        with_temp_config(|| {
            let mut app = PlannerApp::default();
            let before = app.store.len();
            app.open_builder();
            app.commit_builder();
            assert!(app.builder.error.is_some());
            assert_eq!(app.store.len(), before);

            app.builder.title = "Morning Run".into();
            app.commit_builder();
            assert_eq!(app.store.len(), before + 1);
            assert!(!app.show_builder);
        });
    }

    #[test]
    fn builder_commit_moves_draft_into_workout() {
        with_temp_config(|| {
            let mut app = PlannerApp::default();
            app.open_builder();
            app.draft
                .insert(Segment::new_effort(EffortKind::Warmup))
                .unwrap();
            app.draft
                .insert(Segment::new_effort(EffortKind::Run))
                .unwrap();
            app.builder.title = "Intervals".into();
            app.commit_builder();
            assert!(app.draft.is_empty());
            let added = app
                .store
                .list()
                .iter()
                .find(|w| w.title == "Intervals")
                .unwrap();
            assert_eq!(added.segments.len(), 2);
            assert!(added.segments[0].is_warmup());
        });
    }

    #[test]
    fn editor_rejects_bad_numeric_input() {
        let seg = Segment::new_effort(EffortKind::Run);
        let mut editor = SegmentEditor::open(&seg, DistanceUnit::Kilometers);
        editor.minutes = "abc".into();
        let result = editor.apply_to(&seg, DistanceUnit::Kilometers);
        assert!(result.is_err());
    }

    #[test]
    fn editor_applies_duration_and_pace() {
        let seg = Segment::new_effort(EffortKind::Run);
        let mut editor = SegmentEditor::open(&seg, DistanceUnit::Kilometers);
        editor.minutes = "4".into();
        editor.seconds = "30".into();
        editor.intensity = IntensityChoice::Pace;
        editor.bound_min = "3:40".into();
        editor.bound_max = "3:50".into();
        let updated = editor.apply_to(&seg, DistanceUnit::Kilometers).unwrap();
        let Segment::Effort(e) = updated else {
            panic!("expected an effort")
        };
        assert_eq!(e.target, 270);
        assert_eq!(
            e.intensity,
            Intensity::Pace(IntensityBounds {
                min: "3:40".into(),
                max: "3:50".into()
            })
        );
    }

    #[test]
    fn editor_rejects_malformed_pace_bounds() {
        let seg = Segment::new_effort(EffortKind::Run);
        let mut editor = SegmentEditor::open(&seg, DistanceUnit::Kilometers);
        editor.intensity = IntensityChoice::Pace;
        editor.bound_min = "fast".into();
        editor.bound_max = "3:50".into();
        assert!(editor.apply_to(&seg, DistanceUnit::Kilometers).is_err());
    }

    #[test]
    fn editor_updates_repeat_count() {
        let seg = Segment::new_repeat();
        let mut editor = SegmentEditor::open(&seg, DistanceUnit::Kilometers);
        editor.count = "15".into();
        let Segment::Repeat(r) = editor.apply_to(&seg, DistanceUnit::Kilometers).unwrap() else {
            panic!("expected a repeat")
        };
        assert_eq!(r.count, 15);

        editor.count = "0".into();
        assert!(editor.apply_to(&seg, DistanceUnit::Kilometers).is_err());
    }
}
