//! Working/rest day classification.
//!
//! A date is a working day Monday through Friday and a rest day on the
//! weekend, unless an administrator has overridden it.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::DayOverrides;

/// The classification of a calendar date for break-deduction purposes.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::DayKind;
///
/// assert_eq!(DayKind::Rest.to_string(), "Rest day");
/// assert!(DayKind::Working.is_working());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// An ordinary working day.
    Working,
    /// A weekend day or an admin-declared day off.
    Rest,
}

impl DayKind {
    /// Returns true for [`DayKind::Working`].
    pub fn is_working(&self) -> bool {
        *self == DayKind::Working
    }
}

impl From<bool> for DayKind {
    fn from(is_working_day: bool) -> Self {
        if is_working_day {
            DayKind::Working
        } else {
            DayKind::Rest
        }
    }
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Working => write!(f, "Working day"),
            DayKind::Rest => write!(f, "Rest day"),
        }
    }
}

/// Decides whether `date` is a working day.
///
/// An override for the exact date wins; otherwise Saturday and Sunday are
/// rest days and every other weekday is a working day.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::is_working_day;
/// use overtime_engine::models::{DayConfig, DayOverrides};
/// use chrono::NaiveDate;
///
/// let saturday = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// assert!(!is_working_day(saturday, &DayOverrides::new()));
///
/// let overrides = DayOverrides::from_configs([DayConfig {
///     date: saturday,
///     is_working_day: true,
/// }]);
/// assert!(is_working_day(saturday, &overrides));
/// ```
pub fn is_working_day(date: NaiveDate, overrides: &DayOverrides) -> bool {
    overrides
        .get(date)
        .unwrap_or_else(|| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Classifies `date` as a [`DayKind`].
pub fn classify_day(date: NaiveDate, overrides: &DayOverrides) -> DayKind {
    is_working_day(date, overrides).into()
}

/// One day of a month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The date.
    pub date: NaiveDate,
    /// The day of the week.
    pub weekday: Weekday,
    /// Working or rest day after overrides.
    pub day_kind: DayKind,
    /// True if an administrator override decided the classification.
    pub overridden: bool,
}

/// Returns the first and last date of a month.
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| EngineError::InvalidInput {
        field: "month".to_string(),
        message: format!("{}-{:02} is not a valid month", year, month),
    })?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| EngineError::InvalidInput {
            field: "year".to_string(),
            message: format!("{} is out of range", year),
        })?;
    Ok((first, last))
}

/// Classifies every day of a month.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{month_calendar, DayKind};
/// use overtime_engine::models::DayOverrides;
///
/// let days = month_calendar(2026, 2, &DayOverrides::new()).unwrap();
/// assert_eq!(days.len(), 28);
/// assert_eq!(days.iter().filter(|d| d.day_kind == DayKind::Rest).count(), 8);
/// ```
pub fn month_calendar(
    year: i32,
    month: u32,
    overrides: &DayOverrides,
) -> EngineResult<Vec<CalendarDay>> {
    let (first, last) = month_bounds(year, month)?;
    Ok(first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| CalendarDay {
            date,
            weekday: date.weekday(),
            day_kind: classify_day(date, overrides),
            overridden: overrides.contains(date),
        })
        .collect())
}
