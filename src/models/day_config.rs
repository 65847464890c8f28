//! Administrator day overrides.
//!
//! A [`DayConfig`] marks one calendar date as a working or rest day,
//! overriding the weekday default. Calculations never read overrides from
//! shared state; they receive a [`DayOverrides`] snapshot, normally loaded
//! once for the month being viewed.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An override for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    /// The overridden date.
    pub date: NaiveDate,
    /// Whether the date counts as a working day.
    pub is_working_day: bool,
}

/// An immutable snapshot of day overrides keyed by date.
///
/// # Examples
///
/// ```
/// use overtime_engine::models::{DayConfig, DayOverrides};
/// use chrono::NaiveDate;
///
/// let saturday = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// let overrides = DayOverrides::from_configs([DayConfig {
///     date: saturday,
///     is_working_day: true,
/// }]);
///
/// assert_eq!(overrides.get(saturday), Some(true));
/// assert_eq!(overrides.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOverrides {
    entries: BTreeMap<NaiveDate, bool>,
}

impl DayOverrides {
    /// Creates an empty snapshot (every day uses the weekday default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from stored entries. Later entries win on duplicate dates.
    pub fn from_configs<I>(configs: I) -> Self
    where
        I: IntoIterator<Item = DayConfig>,
    {
        Self {
            entries: configs
                .into_iter()
                .map(|c| (c.date, c.is_working_day))
                .collect(),
        }
    }

    /// Returns the override for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<bool> {
        self.entries.get(&date).copied()
    }

    /// Returns true if `date` has an override.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    /// Number of overridden dates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no date is overridden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the overrides in date order.
    pub fn iter(&self) -> impl Iterator<Item = DayConfig> + '_ {
        self.entries.iter().map(|(date, is_working_day)| DayConfig {
            date: *date,
            is_working_day: *is_working_day,
        })
    }
}
