//! Month-grid computation for the calendar tab. Weeks start on Monday.

use chrono::{Datelike, NaiveDate};

/// One displayed month as rows of seven cells; `None` cells pad the first
/// and last week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<NaiveDate>; 7]>,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{name} {year}")
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = NaiveDate::from_ymd_opt(ny, nm, 1);
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        _ => 30,
    }
}

/// Lay out a month with Monday-first weeks.
pub fn month_grid(year: i32, month: u32) -> MonthGrid {
    let mut weeks: Vec<[Option<NaiveDate>; 7]> = Vec::new();
    let mut week: [Option<NaiveDate>; 7] = [None; 7];
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthGrid { year, month, weeks };
    };
    let mut col = first.weekday().num_days_from_monday() as usize;
    for day in 1..=days_in_month(year, month) {
        week[col] = NaiveDate::from_ymd_opt(year, month, day);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }
    MonthGrid { year, month, weeks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_2026_layout() {
        // 2026-02-01 is a Sunday, so the first week has six leading blanks.
        let grid = month_grid(2026, 2);
        assert_eq!(grid.weeks.len(), 5);
        let first_week = grid.weeks[0];
        assert!(first_week[..6].iter().all(Option::is_none));
        assert_eq!(first_week[6], NaiveDate::from_ymd_opt(2026, 2, 1));
        // Last day lands on a Saturday.
        let last_week = grid.weeks[4];
        assert_eq!(last_week[5], NaiveDate::from_ymd_opt(2026, 2, 28));
        assert!(last_week[6].is_none());
    }

    #[test]
    fn all_days_present_once() {
        let grid = month_grid(2026, 3);
        let days: Vec<NaiveDate> = grid
            .weeks
            .iter()
            .flatten()
            .filter_map(|c| *c)
            .collect();
        assert_eq!(days.len(), 31);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn month_navigation_wraps_years() {
        assert_eq!(prev_month(2026, 1), (2025, 12));
        assert_eq!(next_month(2026, 12), (2027, 1));
        assert_eq!(next_month(2026, 5), (2026, 6));
    }

    #[test]
    fn month_label_names_the_month() {
        assert_eq!(month_label(2026, 2), "February 2026");
    }
}
