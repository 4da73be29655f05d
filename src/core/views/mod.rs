//! Aggregated views over broker records.

pub mod buyers_sellers;
pub mod custody;
pub mod metrics;
pub mod top_traders;
pub mod weekly;

use serde::Serialize;

/// Balance movement between an opening and a closing figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceChange {
    pub start_balance: Option<f64>,
    pub end_balance: Option<f64>,
    pub total_change: Option<f64>,
    pub variation_pct: Option<f64>,
}

impl BalanceChange {
    pub fn new(start_balance: Option<f64>, end_balance: Option<f64>) -> Self {
        let total_change = match (start_balance, end_balance) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };
        let variation_pct = match (total_change, start_balance) {
            (Some(change), Some(start)) if start != 0.0 => Some(change / start * 100.0),
            _ => None,
        };
        Self {
            start_balance,
            end_balance,
            total_change,
            variation_pct,
        }
    }
}

/// Opening and closing values of an ordered sequence: the first defined start
/// and the last defined end.
pub(crate) fn first_last<I>(rows: I) -> BalanceChange
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let mut start = None;
    let mut end = None;
    for (row_start, row_end) in rows {
        if start.is_none() {
            start = row_start;
        }
        if row_end.is_some() {
            end = row_end;
        }
    }
    BalanceChange::new(start, end)
}

/// Arithmetic mean of the defined values.
pub(crate) fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
