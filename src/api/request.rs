//! Request types for the Overtime Engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::OvertimeWindow;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClockTime, OvertimeFilter, OvertimeSubmission};

/// Request body for `POST /overtime/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// When set, the employee must exist and any record they already hold
    /// for the date is returned.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The overtime date.
    pub date: NaiveDate,
    /// Start of the window (`HH:MM`).
    pub start_time: String,
    /// End of the window (`HH:MM`).
    pub end_time: String,
}

impl PreviewRequest {
    /// Parses the requested window.
    pub fn window(&self) -> EngineResult<OvertimeWindow> {
        OvertimeWindow::parse(&self.start_time, &self.end_time)
    }
}

/// Request body for `PUT /overtime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOvertimeRequest {
    /// The owning employee.
    pub user_id: String,
    /// The overtime date.
    pub date: NaiveDate,
    /// Start of the window (`HH:MM`).
    pub start_time: String,
    /// End of the window (`HH:MM`).
    pub end_time: String,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
}

impl TryFrom<SubmitOvertimeRequest> for OvertimeSubmission {
    type Error = EngineError;

    fn try_from(req: SubmitOvertimeRequest) -> Result<Self, Self::Error> {
        Ok(OvertimeSubmission {
            start_time: ClockTime::parse(&req.start_time)?,
            end_time: ClockTime::parse(&req.end_time)?,
            user_id: req.user_id,
            date: req.date,
            reason: req.reason.trim().to_string(),
        })
    }
}

/// Request body for `PUT /day-configs/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayConfigRequest {
    /// Whether the date counts as a working day.
    pub is_working_day: bool,
}

/// Query string for `GET /overtime`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOvertimeQuery {
    /// Only records owned by this employee.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Only records on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

impl ListOvertimeQuery {
    /// The record filter part of the query.
    pub fn filter(&self) -> OvertimeFilter {
        OvertimeFilter {
            user_id: self.user_id.clone(),
            from: self.from,
            to: self.to,
        }
    }
}
