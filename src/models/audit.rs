//! Audit records describing how a figure was reached.

use serde::{Deserialize, Serialize};

/// A single step in an audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use overtime_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "break_deduction".to_string(),
///     rule_name: "Break Deduction".to_string(),
///     input: serde_json::json!({"raw_hours": "2.5", "day_kind": "working"}),
///     output: serde_json::json!({"deduction_hours": "0"}),
///     reasoning: "2.5 hours is not over 4 hours, no break deducted".to_string(),
/// };
/// assert_eq!(step.rule_id, "break_deduction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
