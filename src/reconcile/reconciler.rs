//! The overtime reconciler.
//!
//! Turns a user's overtime submission into a stored record: one record per
//! user and date, created on first submission and overwritten by later ones.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::{
    CalendarDay, HoursBreakdown, MonthlySummary, OvertimeWindow, compute_hours_with_policy,
    month_bounds, month_calendar, summarize_month,
};
use crate::config::OvertimePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Actor, DayConfig, DayOverrides, Employee, NewOvertimeRequest, OvertimeChanges, OvertimeFilter,
    OvertimeRequest, OvertimeStatus, OvertimeSubmission,
};
use crate::store::Backend;

use super::submit_guard::SubmissionTracker;

/// What an upsert did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// No record existed; one was inserted.
    Created(OvertimeRequest),
    /// The existing record was overwritten.
    Updated(OvertimeRequest),
}

impl UpsertOutcome {
    /// Returns true for [`UpsertOutcome::Created`].
    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }

    /// The stored record.
    pub fn record(&self) -> &OvertimeRequest {
        match self {
            UpsertOutcome::Created(record) | UpsertOutcome::Updated(record) => record,
        }
    }

    /// Consumes the outcome, returning the stored record.
    pub fn into_record(self) -> OvertimeRequest {
        match self {
            UpsertOutcome::Created(record) | UpsertOutcome::Updated(record) => record,
        }
    }
}

/// What a cancel did.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// The record was deleted.
    Removed(OvertimeRequest),
    /// There was nothing to delete.
    NotFound,
}

/// Payable hours for a window, computed without writing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePreview {
    /// The overtime date.
    pub date: NaiveDate,
    /// How the hours were reached.
    pub breakdown: HoursBreakdown,
    /// The record a submission would overwrite, if the user already has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<OvertimeRequest>,
}

/// Reconciles overtime submissions against the backend.
///
/// The reconciler keeps no record state of its own; every decision is made
/// from a fresh read of the backend, so a failed write leaves nothing behind.
#[derive(Clone)]
pub struct OvertimeReconciler {
    backend: Arc<dyn Backend>,
    policy: OvertimePolicy,
    submissions: SubmissionTracker,
}

impl std::fmt::Debug for OvertimeReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvertimeReconciler")
            .field("policy", &self.policy)
            .field("submissions", &self.submissions)
            .finish_non_exhaustive()
    }
}

impl OvertimeReconciler {
    /// Creates a reconciler over `backend` using `policy`.
    pub fn new(backend: Arc<dyn Backend>, policy: OvertimePolicy) -> Self {
        Self {
            backend,
            policy,
            submissions: SubmissionTracker::new(),
        }
    }

    /// The overtime policy in force.
    pub fn policy(&self) -> &OvertimePolicy {
        &self.policy
    }

    /// Loads the override snapshot for the month containing `date`.
    pub async fn overrides_for_month(&self, date: NaiveDate) -> EngineResult<DayOverrides> {
        let (first, last) = month_bounds(date.year(), date.month())?;
        let configs = self.backend.day_configs_between(first, last).await?;
        Ok(DayOverrides::from_configs(configs))
    }

    /// Computes payable hours for a window on `date` without writing.
    ///
    /// When `user_id` is given the employee must exist and `actor` must be
    /// allowed to act for them; any record they already hold for the date is
    /// returned alongside the breakdown.
    pub async fn preview(
        &self,
        actor: &Actor,
        user_id: Option<&str>,
        date: NaiveDate,
        window: OvertimeWindow,
    ) -> EngineResult<OvertimePreview> {
        let existing = match user_id {
            Some(user_id) => {
                if !actor.can_act_for(user_id) {
                    return Err(forbidden(actor, format!("view overtime for '{}'", user_id)));
                }
                self.require_employee(user_id).await?;
                self.backend.find_overtime(user_id, date).await?
            }
            None => None,
        };

        let overrides = self.overrides_for_month(date).await?;
        let breakdown = compute_hours_with_policy(window, date, &overrides, &self.policy);

        Ok(OvertimePreview {
            date,
            breakdown,
            existing,
        })
    }

    /// Creates or overwrites `submission.user_id`'s record for `submission.date`.
    pub async fn upsert(
        &self,
        actor: &Actor,
        submission: OvertimeSubmission,
    ) -> EngineResult<UpsertOutcome> {
        if !actor.can_act_for(&submission.user_id) {
            return Err(forbidden(
                actor,
                format!("record overtime for '{}'", submission.user_id),
            ));
        }

        let _permit = self
            .submissions
            .begin(&actor.employee_id, &submission.user_id, submission.date)?;

        self.require_employee(&submission.user_id).await?;

        let overrides = self.overrides_for_month(submission.date).await?;
        let window = OvertimeWindow::new(submission.start_time, submission.end_time);
        let breakdown =
            compute_hours_with_policy(window, submission.date, &overrides, &self.policy);

        if breakdown.payable_hours <= rust_decimal::Decimal::ZERO {
            warn!(
                user_id = %submission.user_id,
                date = %submission.date,
                start_time = %submission.start_time,
                end_time = %submission.end_time,
                "Rejected overtime submission with no payable hours"
            );
            return Err(EngineError::InvalidHours {
                date: submission.date,
                hours: breakdown.payable_hours,
            });
        }

        let changes = OvertimeChanges {
            start_time: submission.start_time,
            end_time: submission.end_time,
            total_hours: breakdown.payable_hours,
            reason: submission.reason.clone(),
            status: OvertimeStatus::Approved,
        };

        let outcome = match self
            .backend
            .find_overtime(&submission.user_id, submission.date)
            .await?
        {
            Some(existing) => {
                UpsertOutcome::Updated(self.backend.update_overtime(existing.id, changes).await?)
            }
            None => self.insert_or_update(&submission, changes).await?,
        };

        info!(
            user_id = %submission.user_id,
            date = %submission.date,
            hours = %breakdown.payable_hours,
            day_kind = %breakdown.day_kind,
            created = outcome.is_created(),
            "Recorded overtime"
        );

        Ok(outcome)
    }

    async fn insert_or_update(
        &self,
        submission: &OvertimeSubmission,
        changes: OvertimeChanges,
    ) -> EngineResult<UpsertOutcome> {
        let new = NewOvertimeRequest {
            user_id: submission.user_id.clone(),
            date: submission.date,
            start_time: changes.start_time,
            end_time: changes.end_time,
            total_hours: changes.total_hours,
            reason: changes.reason.clone(),
            status: changes.status,
        };

        match self.backend.insert_overtime(new).await {
            Ok(record) => Ok(UpsertOutcome::Created(record)),
            Err(conflict @ EngineError::DuplicateOvertime { .. }) => {
                debug!(
                    user_id = %submission.user_id,
                    date = %submission.date,
                    "Insert lost to a concurrent writer, updating instead"
                );
                match self
                    .backend
                    .find_overtime(&submission.user_id, submission.date)
                    .await?
                {
                    Some(existing) => Ok(UpsertOutcome::Updated(
                        self.backend.update_overtime(existing.id, changes).await?,
                    )),
                    None => Err(conflict),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes `user_id`'s record for `date`. Deleting nothing succeeds.
    pub async fn cancel(
        &self,
        actor: &Actor,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<CancelOutcome> {
        if !actor.can_act_for(user_id) {
            return Err(forbidden(actor, format!("cancel overtime for '{}'", user_id)));
        }

        let Some(existing) = self.backend.find_overtime(user_id, date).await? else {
            debug!(user_id = %user_id, date = %date, "No overtime to cancel");
            return Ok(CancelOutcome::NotFound);
        };

        match self.backend.delete_overtime(existing.id).await? {
            Some(removed) => {
                info!(user_id = %user_id, date = %date, "Cancelled overtime");
                Ok(CancelOutcome::Removed(removed))
            }
            None => Ok(CancelOutcome::NotFound),
        }
    }

    /// Sets whether `config.date` is a working day. Admin only.
    pub async fn set_day_config(&self, actor: &Actor, config: DayConfig) -> EngineResult<DayConfig> {
        if !actor.is_admin() {
            return Err(forbidden(actor, "change day configuration".to_string()));
        }

        let stored = self.backend.upsert_day_config(config).await?;
        info!(
            actor_id = %actor.employee_id,
            date = %stored.date,
            is_working_day = stored.is_working_day,
            "Updated day configuration"
        );
        Ok(stored)
    }

    /// Classifies every day of a month using the stored overrides.
    pub async fn month_calendar(&self, year: i32, month: u32) -> EngineResult<Vec<CalendarDay>> {
        let (first, last) = month_bounds(year, month)?;
        let overrides = DayOverrides::from_configs(self.backend.day_configs_between(first, last).await?);
        month_calendar(year, month, &overrides)
    }

    /// Lists overtime records visible to `actor`.
    ///
    /// Admins see whatever the filter selects. Other users only ever see
    /// their own records; asking for someone else's is forbidden.
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: OvertimeFilter,
    ) -> EngineResult<Vec<OvertimeRequest>> {
        if !actor.is_admin() {
            match filter.user_id.as_deref() {
                Some(user_id) if user_id != actor.employee_id => {
                    return Err(forbidden(actor, format!("view overtime for '{}'", user_id)));
                }
                _ => filter.user_id = Some(actor.employee_id.clone()),
            }
        }
        self.backend.list_overtime(&filter).await
    }

    /// Summarizes `user_id`'s overtime for one month.
    pub async fn monthly_summary(
        &self,
        actor: &Actor,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<MonthlySummary> {
        if !actor.can_act_for(user_id) {
            return Err(forbidden(actor, format!("view overtime for '{}'", user_id)));
        }

        let (first, last) = month_bounds(year, month)?;
        let records = self
            .backend
            .list_overtime(&OvertimeFilter {
                user_id: Some(user_id.to_string()),
                from: Some(first),
                to: Some(last),
            })
            .await?;
        summarize_month(&records, user_id, year, month)
    }

    async fn require_employee(&self, user_id: &str) -> EngineResult<Employee> {
        self.backend
            .find_employee(user_id)
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                user_id: user_id.to_string(),
            })
    }
}

fn forbidden(actor: &Actor, action: String) -> EngineError {
    EngineError::Forbidden {
        actor_id: actor.employee_id.clone(),
        action,
    }
}
