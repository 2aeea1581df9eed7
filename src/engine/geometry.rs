//! Time ↔ pixel conversions on the 24-hour grid

use crate::config::{GridConfig, HOURS_PER_DAY};
use crate::types::TimeOfDay;

const MINUTES_PER_DAY: u32 = HOURS_PER_DAY * 60;
const QUARTER_HOUR: u32 = 15;

/// Stateless mapping between clock time and grid X
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    px_per_hour: f64,
}

impl Geometry {
    pub fn new(px_per_hour: f64) -> Self {
        Self { px_per_hour }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.px_per_hour)
    }

    pub fn px_per_hour(&self) -> f64 {
        self.px_per_hour
    }

    pub fn grid_width(&self) -> f64 {
        HOURS_PER_DAY as f64 * self.px_per_hour
    }

    pub fn time_to_x(&self, time: TimeOfDay) -> f64 {
        (time.hour as f64 + time.minute as f64 / 60.0) * self.px_per_hour
    }

    /// Inverse of [`Geometry::time_to_x`]. `x == grid_width` maps back to 00:00.
    pub fn x_to_time(&self, x: f64) -> TimeOfDay {
        let total_hours = x / self.px_per_hour;
        let whole = total_hours.floor();
        let mut hour = (whole as i64).rem_euclid(HOURS_PER_DAY as i64) as u32;
        let mut minute = ((total_hours - whole) * 60.0).round() as u32;
        if minute == 60 {
            minute = 0;
            hour = (hour + 1) % HOURS_PER_DAY;
        }
        TimeOfDay { hour, minute }
    }

    /// Clock label for a segment end; the end of the grid reads `24:00`.
    pub fn end_label(&self, to_x: f64) -> String {
        if to_x >= self.grid_width() {
            "24:00".to_string()
        } else {
            self.x_to_time(to_x).to_string()
        }
    }
}

/// Round to the nearest quarter hour on the 24h ring (23:53 → 00:00).
pub fn snap_to_quarter_hour(time: TimeOfDay) -> TimeOfDay {
    let total = time.minutes_since_midnight();
    let snapped =
        (total.saturating_add(QUARTER_HOUR / 2) / QUARTER_HOUR) * QUARTER_HOUR % MINUTES_PER_DAY;
    TimeOfDay {
        hour: snapped / 60,
        minute: snapped % 60,
    }
}

/// Format decimal hours as `HH:MM`, rounded to the minute.
///
/// Negative, NaN and infinite inputs all format as `00:00`. Durations of a
/// full day or more keep counting (`24:00`).
pub fn format_hours_as_clock(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "00:00".to_string();
    }
    let total_minutes = (hours * 60.0).round() as u64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
