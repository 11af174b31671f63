use chrono::{DateTime, Utc};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time remaining until the deadline, broken into display units.
/// `expired` distinguishes a deadline already in the past from the
/// legitimate all-zero reading at the exact deadline instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub expired: bool,
}

impl CountdownState {
    /// Decompose `deadline − now` into days/hours/minutes/seconds.
    /// Pure: same inputs, same output, no clock access.
    pub fn remaining(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Self {
        let delta_ms = deadline.signed_duration_since(now).num_milliseconds();
        if delta_ms <= 0 {
            return Self { expired: true, ..Self::default() };
        }
        Self {
            days: delta_ms / MS_PER_DAY,
            hours: (delta_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (delta_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (delta_ms % MS_PER_MINUTE) / MS_PER_SECOND,
            expired: false,
        }
    }

    /// "02d 05:41:09" readout for the header strip.
    pub fn readout(&self) -> String {
        if self.expired {
            return "time's up".to_string();
        }
        format!(
            "{:02}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
