//! Calculation logic for the Overtime Engine.
//!
//! This module contains the pure functions behind overtime: working/rest day
//! classification with administrator overrides, payable hours for an
//! overtime window with the credit cutoff and break deductions, and the
//! monthly summary and pagination used by history views.

mod day_classifier;
mod hour_window;
mod monthly_summary;

pub use day_classifier::{
    CalendarDay, DayKind, classify_day, is_working_day, month_bounds, month_calendar,
};
pub use hour_window::{
    DeductionRule, HOURS_DECIMAL_PLACES, HoursBreakdown, OvertimeWindow, calculate_overtime_hours,
    compute_hours, compute_hours_with_policy, round_hours, select_deduction,
};
pub use monthly_summary::{MonthlySummary, Page, paginate, summarize_month};
