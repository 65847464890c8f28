//! Wall-clock time model.
//!
//! Overtime windows are entered as 24-hour `HH:MM` strings. Table backends
//! hand them back as `HH:MM:SS`, so a trailing seconds component is accepted
//! and dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A minute-precision time of day.
///
/// # Examples
///
/// ```
/// use overtime_engine::models::ClockTime;
///
/// let time: ClockTime = "17:30".parse().unwrap();
/// assert_eq!(time.minutes_since_midnight(), 17 * 60 + 30);
/// assert_eq!(time.to_string(), "17:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Creates a clock time in const context.
    ///
    /// # Panics
    ///
    /// Panics if `hour` or `minute` is out of range.
    pub const fn hm(hour: u32, minute: u32) -> Self {
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(time) => Self(time),
            None => panic!("clock time out of range"),
        }
    }

    /// Creates a clock time, returning `None` when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parses `HH:MM` or `HH:MM:SS`.
    pub fn parse(value: &str) -> EngineResult<Self> {
        let trimmed = value.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| EngineError::InvalidTime {
                value: value.to_string(),
            })?;
        Ok(Self::from(time))
    }

    /// The hour component (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// The minute component (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Fractional hours since midnight (`hours + minutes / 60`).
    ///
    /// ```
    /// use overtime_engine::models::ClockTime;
    /// use rust_decimal::Decimal;
    ///
    /// let time: ClockTime = "14:30".parse().unwrap();
    /// assert_eq!(time.as_hours(), Decimal::new(145, 1));
    /// ```
    pub fn as_hours(&self) -> Decimal {
        Decimal::from(self.minutes_since_midnight()) / Decimal::from(60)
    }

    /// The underlying chrono time.
    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }
}

/// Truncates to the minute.
impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hh_mm() {
        let time = ClockTime::parse("08:05").unwrap();
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 5);
    }

    #[test]
    fn test_parse_ignores_seconds() {
        let time = ClockTime::parse("17:30:45").unwrap();
        assert_eq!(time, ClockTime::from_hm(17, 30).unwrap());
        assert_eq!(time.to_string(), "17:30");
    }

    #[test]
    fn test_parse_single_digit_hour() {
        assert_eq!(
            ClockTime::parse("9:15").unwrap(),
            ClockTime::from_hm(9, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(ClockTime::parse(" 18:00 ").unwrap(), ClockTime::hm(18, 0));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("25:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::parse("12:00:61").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for value in ["", "noon", "12", "1:2:3:4", "-1:00", "12:0a", "5pm"] {
            match ClockTime::parse(value) {
                Err(EngineError::InvalidTime { value: v }) => assert_eq!(v, value),
                other => panic!("expected InvalidTime for {:?}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_from_naive_time_truncates_seconds() {
        let time = ClockTime::from(NaiveTime::from_hms_opt(21, 59, 59).unwrap());
        assert_eq!(time, ClockTime::hm(21, 59));
        assert_eq!(time.as_naive_time(), NaiveTime::from_hms_opt(21, 59, 0).unwrap());
    }

    #[test]
    fn test_as_hours_is_fractional() {
        assert_eq!(ClockTime::parse("17:30").unwrap().as_hours(), Decimal::new(175, 1));
        assert_eq!(ClockTime::parse("00:00").unwrap().as_hours(), Decimal::ZERO);
    }

    #[test]
    fn test_serde_uses_hh_mm() {
        let time = ClockTime::parse("07:45:00").unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"07:45\"");

        let parsed: ClockTime = serde_json::from_str("\"22:00\"").unwrap();
        assert_eq!(parsed, ClockTime::from_hm(22, 0).unwrap());

        assert!(serde_json::from_str::<ClockTime>("\"late\"").is_err());
    }
}
