//! Overtime history views: per-month summaries and list pagination.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::OvertimeRequest;

use super::day_classifier::month_bounds;
use super::hour_window::round_hours;

/// One user's overtime for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The owning employee.
    pub user_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Number of overtime records in the month.
    pub record_count: usize,
    /// Sum of payable hours.
    pub total_hours: Decimal,
    /// The month's records, oldest first.
    pub records: Vec<OvertimeRequest>,
}

/// Summarizes `user_id`'s records that fall in the given month.
///
/// Records of other users or other months are ignored, so the caller can
/// pass an unfiltered listing.
pub fn summarize_month(
    records: &[OvertimeRequest],
    user_id: &str,
    year: i32,
    month: u32,
) -> EngineResult<MonthlySummary> {
    let (first, last) = month_bounds(year, month)?;

    let mut month_records: Vec<OvertimeRequest> = records
        .iter()
        .filter(|r| r.user_id == user_id && r.date >= first && r.date <= last)
        .cloned()
        .collect();
    month_records.sort_by_key(|r| r.date);

    let total_hours = round_hours(month_records.iter().map(|r| r.total_hours).sum());

    Ok(MonthlySummary {
        user_id: user_id.to_string(),
        year,
        month,
        record_count: month_records.len(),
        total_hours,
        records: month_records,
    })
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    /// Page size requested.
    pub per_page: usize,
    /// Total items across all pages.
    pub total: usize,
    /// Number of pages (0 when there are no items).
    pub total_pages: usize,
}

/// Slices `items` into the 1-based `page` of size `per_page`.
///
/// Page 0 is treated as page 1; a page past the end is empty.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::paginate;
///
/// let page = paginate((1..=7).collect::<Vec<_>>(), 2, 3).unwrap();
/// assert_eq!(page.items, vec![4, 5, 6]);
/// assert_eq!(page.total_pages, 3);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> EngineResult<Page<T>> {
    if per_page == 0 {
        return Err(EngineError::InvalidInput {
            field: "per_page".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Ok(Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    })
}
