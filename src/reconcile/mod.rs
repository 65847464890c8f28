//! Overtime submission handling.
//!
//! The [`OvertimeReconciler`] is the only writer of overtime records and
//! day overrides. It checks who is acting, computes hours against the
//! month's override snapshot and keeps one record per user and date.

mod reconciler;
mod submit_guard;

pub use reconciler::{CancelOutcome, OvertimePreview, OvertimeReconciler, UpsertOutcome};
pub use submit_guard::{SubmissionPermit, SubmissionTracker};
