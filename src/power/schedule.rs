//! # Weekly power schedule.
//!
//! A [`PowerSchedule`] maps a day rule plus a time window to a [`Mode`]. The
//! list is evaluated in declaration order against the current wall-clock
//! weekday and time of day; the first match wins, and no match falls back to
//! [`Mode::AlwaysOn`].
//!
//! ## Window semantics
//! `start` is inclusive, `end` exclusive. `end == 00:00` means end-of-day,
//! i.e. the window runs from `start` to midnight. Schedules are validated at
//! parse time: `start < end` unless `end` is midnight.

use std::str::FromStr;

use chrono::{NaiveTime, Weekday};

use crate::error::ConfigError;
use crate::power::Mode;

/// Which days a schedule entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRule {
    /// A single weekday.
    Day(Weekday),
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekend,
    /// Every day.
    Anyday,
}

impl DayRule {
    /// True if `day` falls under this rule.
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayRule::Day(d) => *d == day,
            DayRule::Weekdays => !matches!(day, Weekday::Sat | Weekday::Sun),
            DayRule::Weekend => matches!(day, Weekday::Sat | Weekday::Sun),
            DayRule::Anyday => true,
        }
    }
}

impl FromStr for DayRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = match s {
            "Monday" => DayRule::Day(Weekday::Mon),
            "Tuesday" => DayRule::Day(Weekday::Tue),
            "Wednesday" => DayRule::Day(Weekday::Wed),
            "Thursday" => DayRule::Day(Weekday::Thu),
            "Friday" => DayRule::Day(Weekday::Fri),
            "Saturday" => DayRule::Day(Weekday::Sat),
            "Sunday" => DayRule::Day(Weekday::Sun),
            "Weekday" => DayRule::Weekdays,
            "Weekend" => DayRule::Weekend,
            "Anyday" => DayRule::Anyday,
            other => return Err(ConfigError::UnknownWeekday(other.to_string())),
        };
        Ok(rule)
    }
}

/// One entry of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSchedule {
    /// Days this entry applies to.
    pub days: DayRule,
    /// Window start, inclusive.
    pub start: NaiveTime,
    /// Window end, exclusive; `00:00` means end-of-day.
    pub end: NaiveTime,
    /// Mode active inside the window.
    pub mode: Mode,
}

impl PowerSchedule {
    /// Parses the CLI grammar `weekday,start,end,mode` (times as `HH:MM`).
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidSchedule {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.split(',');
        let (days, start, end, mode) = match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some(d), Some(s), Some(e), Some(m), None) => (d, s, e, m),
            _ => return Err(invalid("expected weekday,start,end,mode")),
        };

        let days: DayRule = days.parse()?;
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        let mode: Mode = mode.parse()?;

        if end != midnight() && start >= end {
            return Err(invalid("start must be before end"));
        }

        Ok(Self {
            days,
            start,
            end,
            mode,
        })
    }

    /// True if the window covers `time` on `day`.
    pub fn contains(&self, day: Weekday, time: NaiveTime) -> bool {
        if !self.days.matches(day) || time < self.start {
            return false;
        }
        // end == 00:00 reads as end-of-day: the window runs to midnight.
        self.end == midnight() || time < self.end
    }
}

/// Resolves the active mode for `day`/`time`: first declared match wins,
/// no match defaults to [`Mode::AlwaysOn`].
pub fn resolve_mode(schedules: &[PowerSchedule], day: Weekday, time: NaiveTime) -> Mode {
    schedules
        .iter()
        .find(|s| s.contains(day, time))
        .map(|s| s.mode)
        .unwrap_or(Mode::AlwaysOn)
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

fn parse_time(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| ConfigError::InvalidTime(s.to_string()))
}
