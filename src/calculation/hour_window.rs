//! Payable hours for an overtime window.
//!
//! An overtime window runs from a start to an end clock time on one date.
//! The end is capped at the policy's credit cutoff (22:00 by default), and
//! an unpaid break is deducted depending on the window length and whether
//! the date is a working or rest day:
//!
//! | Raw duration | Working day | Rest day |
//! |---|---|---|
//! | ≤ 4h | 0 | 0 |
//! | > 4h and ≤ 5h | 0 | 0.5h |
//! | > 5h and < 8h | 0.5h | 0.5h |
//! | ≥ 8h | 1.0h | 1.0h |

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::OvertimePolicy;
use crate::error::EngineResult;
use crate::models::{AuditStep, ClockTime, DayOverrides};

use super::day_classifier::{DayKind, classify_day};

/// Decimal places kept on payable hours.
pub const HOURS_DECIMAL_PLACES: u32 = 2;

/// A start/end clock time pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeWindow {
    /// Start of the window.
    pub start: ClockTime,
    /// End of the window, as entered.
    pub end: ClockTime,
}

impl OvertimeWindow {
    /// Creates a window from two clock times.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Parses a window from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        Ok(Self {
            start: ClockTime::parse(start)?,
            end: ClockTime::parse(end)?,
        })
    }
}

/// Which unpaid break was deducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionRule {
    /// No break deducted.
    None,
    /// The short (30 minute) break.
    ShortBreak,
    /// The full (1 hour) break.
    FullBreak,
}

/// The result of calculating payable hours for a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// The window as entered.
    pub window: OvertimeWindow,
    /// The end time actually credited.
    pub effective_end: ClockTime,
    /// True if the entered end was past the credit cutoff.
    pub end_capped: bool,
    /// Working or rest day.
    pub day_kind: DayKind,
    /// Credited span before deductions, rounded for display (0 for empty windows).
    pub raw_hours: Decimal,
    /// The break rule applied.
    pub deduction_rule: DeductionRule,
    /// Hours deducted for the break.
    pub deduction_hours: Decimal,
    /// Payable hours, rounded to 2 decimal places.
    pub payable_hours: Decimal,
    /// How the figure was reached.
    pub audit_step: AuditStep,
}

/// Rounds hours to [`HOURS_DECIMAL_PLACES`], halves away from zero.
///
/// ```
/// use overtime_engine::calculation::round_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_hours(Decimal::from_str("2.345").unwrap()).to_string(), "2.35");
/// assert_eq!(round_hours(Decimal::from(11)).to_string(), "11.00");
/// ```
pub fn round_hours(hours: Decimal) -> Decimal {
    let mut rounded =
        hours.round_dp_with_strategy(HOURS_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(HOURS_DECIMAL_PLACES);
    rounded
}

/// Picks the break deduction for a raw duration.
///
/// The full break wins at or above its threshold. Below it, the short break
/// applies above the rest-day threshold when the day is a rest day, or above
/// the working-day threshold on any day.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{select_deduction, DayKind, DeductionRule};
/// use overtime_engine::config::OvertimePolicy;
/// use rust_decimal::Decimal;
///
/// let policy = OvertimePolicy::default();
/// let four_and_a_half = Decimal::new(45, 1);
///
/// let (rule, _) = select_deduction(four_and_a_half, DayKind::Working, &policy);
/// assert_eq!(rule, DeductionRule::None);
///
/// let (rule, hours) = select_deduction(four_and_a_half, DayKind::Rest, &policy);
/// assert_eq!(rule, DeductionRule::ShortBreak);
/// assert_eq!(hours, Decimal::new(5, 1));
/// ```
pub fn select_deduction(
    raw_hours: Decimal,
    day_kind: DayKind,
    policy: &OvertimePolicy,
) -> (DeductionRule, Decimal) {
    if raw_hours >= policy.full_break_threshold_hours {
        (DeductionRule::FullBreak, policy.full_break_deduction_hours)
    } else if raw_hours > policy.short_break_threshold_hours
        && (day_kind == DayKind::Rest || raw_hours > policy.working_day_short_break_threshold_hours)
    {
        (DeductionRule::ShortBreak, policy.short_break_deduction_hours)
    } else {
        (DeductionRule::None, Decimal::ZERO)
    }
}

/// Calculates payable hours for a window on a day of the given kind.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::{calculate_overtime_hours, DayKind, OvertimeWindow};
/// use overtime_engine::config::OvertimePolicy;
/// use rust_decimal::Decimal;
///
/// let window = OvertimeWindow::parse("17:30", "23:00").unwrap();
/// let result = calculate_overtime_hours(window, DayKind::Working, &OvertimePolicy::default(), 1);
///
/// assert!(result.end_capped);
/// assert_eq!(result.effective_end.to_string(), "22:00");
/// assert_eq!(result.payable_hours, Decimal::new(45, 1));
/// ```
pub fn calculate_overtime_hours(
    window: OvertimeWindow,
    day_kind: DayKind,
    policy: &OvertimePolicy,
    step_number: u32,
) -> HoursBreakdown {
    let effective_end = window.end.min(policy.credit_cutoff);
    let end_capped = window.end > policy.credit_cutoff;
    let raw_minutes = i64::from(effective_end.minutes_since_midnight())
        - i64::from(window.start.minutes_since_midnight());
    let raw_hours = Decimal::from(raw_minutes) / Decimal::from(60);

    let (deduction_rule, deduction_hours, payable_hours, reasoning) = if raw_hours <= Decimal::ZERO
    {
        (
            DeductionRule::None,
            Decimal::ZERO,
            round_hours(Decimal::ZERO),
            format!(
                "Window {}-{} credits no time before the {} cutoff, no hours payable",
                window.start, window.end, policy.credit_cutoff
            ),
        )
    } else {
        let (rule, deduction) = select_deduction(raw_hours, day_kind, policy);
        let payable = round_hours((raw_hours - deduction).max(Decimal::ZERO));
        let reasoning = match rule {
            DeductionRule::FullBreak => format!(
                "{} hours credited is at least {} hours, {} hour break deducted",
                round_hours(raw_hours).normalize(),
                policy.full_break_threshold_hours.normalize(),
                deduction.normalize()
            ),
            DeductionRule::ShortBreak => format!(
                "{} hours credited on a {} is over {} hours, {} hour break deducted",
                round_hours(raw_hours).normalize(),
                day_kind.to_string().to_lowercase(),
                if day_kind == DayKind::Rest {
                    policy.short_break_threshold_hours.normalize()
                } else {
                    policy.working_day_short_break_threshold_hours.normalize()
                },
                deduction.normalize()
            ),
            DeductionRule::None => format!(
                "{} hours credited on a {} needs no break deduction",
                round_hours(raw_hours).normalize(),
                day_kind.to_string().to_lowercase()
            ),
        };
        (rule, deduction, payable, reasoning)
    };

    let raw_display = round_hours(raw_hours.max(Decimal::ZERO));

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_hours".to_string(),
        rule_name: "Overtime Hours".to_string(),
        input: serde_json::json!({
            "start_time": window.start.to_string(),
            "end_time": window.end.to_string(),
            "credit_cutoff": policy.credit_cutoff.to_string(),
            "day_kind": day_kind,
        }),
        output: serde_json::json!({
            "effective_end": effective_end.to_string(),
            "raw_hours": raw_display.to_string(),
            "deduction_rule": deduction_rule,
            "deduction_hours": deduction_hours.normalize().to_string(),
            "payable_hours": payable_hours.to_string(),
        }),
        reasoning,
    };

    HoursBreakdown {
        window,
        effective_end,
        end_capped,
        day_kind,
        raw_hours: raw_display,
        deduction_rule,
        deduction_hours,
        payable_hours,
        audit_step,
    }
}

/// Calculates payable hours for a window on `date` under `policy`.
pub fn compute_hours_with_policy(
    window: OvertimeWindow,
    date: NaiveDate,
    overrides: &DayOverrides,
    policy: &OvertimePolicy,
) -> HoursBreakdown {
    calculate_overtime_hours(window, classify_day(date, overrides), policy, 1)
}

/// Calculates payable hours for `HH:MM` start and end times on `date`
/// using the default policy.
///
/// Returns an error only when a time cannot be parsed.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::compute_hours;
/// use overtime_engine::models::DayOverrides;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// // 2026-01-17 is a Saturday: 12 hours less the full break
/// let saturday = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// let hours = compute_hours("08:00", "20:00", saturday, &DayOverrides::new()).unwrap();
/// assert_eq!(hours, Decimal::from(11));
/// ```
pub fn compute_hours(
    start: &str,
    end: &str,
    date: NaiveDate,
    overrides: &DayOverrides,
) -> EngineResult<Decimal> {
    let window = OvertimeWindow::parse(start, end)?;
    Ok(compute_hours_with_policy(window, date, overrides, &OvertimePolicy::default()).payable_hours)
}
