//! Session XP scoring
//!
//! Scores a completed session from its pause-free time window. The curve is
//! inverse in worked hours (shorter days score higher), with time-of-day
//! bonuses for starting before 08:00 and finishing before noon, both judged
//! on the local wall clock.

use chrono::{DateTime, TimeZone, Timelike};

/// Scoring curve constants
pub struct XpCurve;

impl XpCurve {
    /// Shortest session credited, in hours
    pub const MIN_HOURS: f64 = 0.25;

    /// Longest session credited, in hours
    pub const MAX_HOURS: f64 = 12.0;

    /// Numerator of the inverse-time curve
    pub const NUMERATOR: f64 = 1200.0;

    /// Offset keeping the curve finite at the short end
    pub const OFFSET: f64 = 0.25;

    /// Local hour before which a start earns the early bonus
    pub const EARLY_START_HOUR: u32 = 8;

    /// Local hour before which an end earns the morning bonus
    pub const MORNING_END_HOUR: u32 = 12;

    /// Each time-of-day bonus
    pub const TIME_BONUS: f64 = 0.10;

    /// Cap across stacked bonuses
    pub const MAX_BONUS: f64 = 0.20;

    /// Lowest score the curve can produce (12 hours, no bonus)
    pub const MIN_XP: u32 = 98;

    /// Highest score the curve can produce (15 minutes, both bonuses)
    pub const MAX_XP: u32 = 2880;

    /// Clamp a raw duration into the credited window.
    pub fn clamp_hours(hours: f64) -> f64 {
        hours.clamp(Self::MIN_HOURS, Self::MAX_HOURS)
    }
}

/// Score a session from its pause-free window.
///
/// `start` and `end` carry the caller's zone; the time-of-day bonuses read
/// their local clock. A non-positive or tiny window clamps up to 15 minutes,
/// a marathon clamps down to 12 hours.
pub fn compute_xp<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> u32 {
    let elapsed = end.clone().signed_duration_since(start.clone());
    let elapsed_hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
    let hours = XpCurve::clamp_hours(elapsed_hours);
    let base = (XpCurve::NUMERATOR / (hours + XpCurve::OFFSET)).round();

    let mut bonus = 0.0;
    if start.hour() < XpCurve::EARLY_START_HOUR {
        bonus += XpCurve::TIME_BONUS;
    }
    if end.hour() < XpCurve::MORNING_END_HOUR {
        bonus += XpCurve::TIME_BONUS;
    }
    let bonus = bonus.min(XpCurve::MAX_BONUS);

    (base * (1.0 + bonus)).round() as u32
}
