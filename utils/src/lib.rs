//! Shared display helpers for govlens.

pub mod format;
pub mod time;

pub use format::{format_compact, format_large, format_percentage, micro_to_display};
pub use time::{format_countdown, format_date, time_remaining, Countdown};
