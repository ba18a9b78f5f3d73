use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Controls how many days the window shows and the header tick granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomLevel {
    Week,
    Month,
    Quarter,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 3] = [ZoomLevel::Week, ZoomLevel::Month, ZoomLevel::Quarter];

    pub fn total_days(self) -> i64 {
        match self {
            ZoomLevel::Week => 7,
            ZoomLevel::Month => 30,
            ZoomLevel::Quarter => 90,
        }
    }

    /// Header tick spacing: daily ticks at week zoom, weekly otherwise.
    pub fn tick_step_days(self) -> i64 {
        match self {
            ZoomLevel::Week => 1,
            ZoomLevel::Month | ZoomLevel::Quarter => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Week => "Week",
            ZoomLevel::Month => "Month",
            ZoomLevel::Quarter => "Quarter",
        }
    }
}

/// The visible date range, parameterized by an anchor date and zoom level.
#[derive(Debug, Clone, Copy)]
pub struct ViewWindow {
    pub anchor: NaiveDate,
    pub zoom: ZoomLevel,
}

impl ViewWindow {
    pub fn new(anchor: NaiveDate, zoom: ZoomLevel) -> Self {
        Self { anchor, zoom }
    }

    /// Anchored at the first of the current month, month zoom.
    pub fn this_month() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.with_day(1).unwrap_or(today), ZoomLevel::Month)
    }

    /// First visible date. Quarter zoom pulls the start back one month so
    /// the anchor month sits centered rather than leading.
    pub fn view_start(&self) -> NaiveDate {
        match self.zoom {
            ZoomLevel::Quarter => self
                .anchor
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.anchor),
            _ => self.anchor,
        }
    }

    pub fn total_days(&self) -> i64 {
        self.zoom.total_days()
    }

    /// First date past the window.
    pub fn view_end(&self) -> NaiveDate {
        self.view_start() + chrono::Duration::days(self.total_days())
    }

    pub fn axis(&self) -> TimeAxis {
        TimeAxis {
            view_start: self.view_start(),
            total_days: self.total_days(),
        }
    }

    /// Navigation always steps one calendar month, regardless of zoom.
    pub fn prev_month(&mut self) {
        self.anchor = self
            .anchor
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.anchor);
    }

    pub fn next_month(&mut self) {
        self.anchor = self
            .anchor
            .checked_add_months(Months::new(1))
            .unwrap_or(self.anchor);
    }

    pub fn jump_to_today(&mut self) {
        let today = Local::now().date_naive();
        self.anchor = today.with_day(1).unwrap_or(today);
    }
}

/// Pure, stateless conversion between calendar dates and normalized
/// horizontal position (percent of timeline width).
///
/// The mapper never clamps; callers clip at 0/100 when drawing and cull
/// tasks via [`TimeAxis::is_visible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    pub view_start: NaiveDate,
    pub total_days: i64,
}

impl TimeAxis {
    /// Position of `date` as a percentage of the window width. May fall
    /// outside 0–100 for dates outside the window.
    pub fn position_of(&self, date: NaiveDate) -> f32 {
        let days = (date - self.view_start).num_days() as f32;
        days / self.total_days as f32 * 100.0
    }

    /// Width of an inclusive date range as a percentage of the window.
    pub fn width_of(&self, start: NaiveDate, end: NaiveDate) -> f32 {
        let days = ((end - start).num_days() + 1) as f32;
        days / self.total_days as f32 * 100.0
    }

    /// Rounded inverse of [`TimeAxis::position_of`].
    pub fn date_at(&self, percent: f32) -> NaiveDate {
        let days = (percent / 100.0 * self.total_days as f32).round() as i64;
        self.view_start + chrono::Duration::days(days)
    }

    /// Cull rule: a range is rendered unless it starts past the right edge
    /// or ends before the left edge.
    pub fn is_visible(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let left = self.position_of(start);
        !(left > 100.0 || left + self.width_of(start, end) < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> TimeAxis {
        TimeAxis {
            view_start: date(2024, 3, 1),
            total_days: 31,
        }
    }

    #[test]
    fn position_and_width_match_march_scenario() {
        let axis = march();
        // 2024-03-05 is 4 days in: 4/31 ≈ 12.9%.
        assert!((axis.position_of(date(2024, 3, 5)) - 12.903).abs() < 0.01);
        // Six inclusive days: 6/31 ≈ 19.4%.
        assert!((axis.width_of(date(2024, 3, 5), date(2024, 3, 10)) - 19.354).abs() < 0.01);
    }

    #[test]
    fn date_at_inverts_position_of_within_the_window() {
        let axis = march();
        for offset in 0..31 {
            let d = axis.view_start + chrono::Duration::days(offset);
            assert_eq!(axis.date_at(axis.position_of(d)), d);
        }
    }

    #[test]
    fn width_grows_strictly_with_duration() {
        let axis = march();
        let start = date(2024, 3, 3);
        let mut previous = 0.0;
        for span in 0..20 {
            let w = axis.width_of(start, start + chrono::Duration::days(span));
            assert!(w > previous);
            previous = w;
        }
    }

    #[test]
    fn tasks_outside_the_window_are_culled() {
        let axis = march();
        // Entirely before.
        assert!(!axis.is_visible(date(2024, 2, 10), date(2024, 2, 20)));
        // Entirely after.
        assert!(!axis.is_visible(date(2024, 4, 2), date(2024, 4, 9)));
        // Partial overlaps stay visible.
        assert!(axis.is_visible(date(2024, 2, 25), date(2024, 3, 3)));
        assert!(axis.is_visible(date(2024, 3, 28), date(2024, 4, 10)));
        // Ends exactly on the left edge: still rendered.
        assert!(axis.is_visible(date(2024, 2, 25), date(2024, 3, 1)));
    }

    #[test]
    fn zoom_levels_drive_day_counts_and_ticks() {
        assert_eq!(ZoomLevel::Week.total_days(), 7);
        assert_eq!(ZoomLevel::Month.total_days(), 30);
        assert_eq!(ZoomLevel::Quarter.total_days(), 90);
        assert_eq!(ZoomLevel::Week.tick_step_days(), 1);
        assert_eq!(ZoomLevel::Month.tick_step_days(), 7);
        assert_eq!(ZoomLevel::Quarter.tick_step_days(), 7);
    }

    #[test]
    fn quarter_zoom_centers_the_anchor_month() {
        let window = ViewWindow::new(date(2024, 3, 1), ZoomLevel::Quarter);
        assert_eq!(window.view_start(), date(2024, 2, 1));

        let month = ViewWindow::new(date(2024, 3, 1), ZoomLevel::Month);
        assert_eq!(month.view_start(), date(2024, 3, 1));
    }

    #[test]
    fn navigation_steps_one_calendar_month_at_any_zoom() {
        for zoom in ZoomLevel::ALL {
            let mut window = ViewWindow::new(date(2024, 3, 1), zoom);
            window.next_month();
            assert_eq!(window.anchor, date(2024, 4, 1));
            window.prev_month();
            window.prev_month();
            assert_eq!(window.anchor, date(2024, 2, 1));
        }
        // Month-length clamping at the end of longer months.
        let mut window = ViewWindow::new(date(2024, 3, 31), ZoomLevel::Month);
        window.next_month();
        assert_eq!(window.anchor, date(2024, 4, 30));
    }
}
