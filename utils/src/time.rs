//! Time formatting helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Whole days, hours and minutes left in a voting period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl Countdown {
    pub fn is_over(&self) -> bool {
        *self == Self::default()
    }
}

/// Time left until `end`, clamped at zero once it has passed.
pub fn time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let diff = (end - now).num_milliseconds().max(0);
    Countdown {
        days: (diff / DAY_MS) as u64,
        hours: ((diff % DAY_MS) / HOUR_MS) as u64,
        minutes: ((diff % HOUR_MS) / MINUTE_MS) as u64,
    }
}

/// `"Xd Yh Zm"`.
pub fn format_countdown(countdown: &Countdown) -> String {
    format!(
        "{}d {}h {}m",
        countdown.days, countdown.hours, countdown.minutes
    )
}

/// Calendar date such as `"Mar 5, 2024"`.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}
