//! Overtime request model and related types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClockTime;

/// Status of an overtime record.
///
/// Overtime is self-service and auto-approved, so `Approved` is the only
/// state this engine produces. The `pending`/`rejected` states of the
/// tool-borrowing workflow are reserved for that workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    /// Recorded and counted.
    #[default]
    Approved,
}

/// One user's overtime session for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The owning employee.
    pub user_id: String,
    /// The overtime date.
    pub date: NaiveDate,
    /// Start of the window.
    pub start_time: ClockTime,
    /// End of the window, as entered (before the credit cutoff is applied).
    pub end_time: ClockTime,
    /// Payable hours, rounded to 2 decimal places.
    pub total_hours: Decimal,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
    /// Record status.
    #[serde(default)]
    pub status: OvertimeStatus,
    /// When the record was first stored.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Owner's employee code, joined on listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    /// Owner's display name, joined on listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
}

/// Values for inserting a new overtime record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOvertimeRequest {
    /// The owning employee.
    pub user_id: String,
    /// The overtime date.
    pub date: NaiveDate,
    /// Start of the window.
    pub start_time: ClockTime,
    /// End of the window.
    pub end_time: ClockTime,
    /// Payable hours.
    pub total_hours: Decimal,
    /// Free-text reason.
    pub reason: String,
    /// Initial status.
    pub status: OvertimeStatus,
}

/// Values written when editing an existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct OvertimeChanges {
    /// New start of the window.
    pub start_time: ClockTime,
    /// New end of the window.
    pub end_time: ClockTime,
    /// Recomputed payable hours.
    pub total_hours: Decimal,
    /// New reason.
    pub reason: String,
    /// Status after the edit.
    pub status: OvertimeStatus,
}

/// A user's overtime submission for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeSubmission {
    /// The owning employee.
    pub user_id: String,
    /// The overtime date.
    pub date: NaiveDate,
    /// Start of the window.
    pub start_time: ClockTime,
    /// End of the window.
    pub end_time: ClockTime,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
}

/// Criteria for listing overtime records. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeFilter {
    /// Only records owned by this employee.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Only records on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl OvertimeFilter {
    /// Returns true if `record` satisfies every criterion.
    pub fn matches(&self, record: &OvertimeRequest) -> bool {
        self.user_id.as_deref().is_none_or(|u| u == record.user_id)
            && self.from.is_none_or(|from| record.date >= from)
            && self.to.is_none_or(|to| record.date <= to)
    }
}
