//! Per-broker business-day gap filling.

use crate::core::record::BrokerRecord;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every weekday in `[start, end]`. No holiday calendar is applied.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if is_business_day(day) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

/// Places each broker's rows on the global business-day axis spanning the
/// dataset, inserting a row for every missing day and carrying numeric values
/// forward within that broker only.
///
/// Rows without a valid date or dated on a weekend have no slot on the axis
/// and are dropped. When a broker has several rows for the same day the last
/// one wins.
pub fn fill_missing_business_days(records: &[BrokerRecord]) -> Vec<BrokerRecord> {
    let valid_dates = records.iter().filter_map(|r| r.date);
    let (Some(start), Some(end)) = (valid_dates.clone().min(), valid_dates.max()) else {
        return Vec::new();
    };
    let axis = business_days(start, end);

    let mut order: Vec<&str> = Vec::new();
    let mut by_broker: HashMap<&str, BTreeMap<NaiveDate, &BrokerRecord>> = HashMap::new();
    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        let rows = by_broker.entry(record.broker.as_str()).or_insert_with(|| {
            order.push(record.broker.as_str());
            BTreeMap::new()
        });
        if is_business_day(date) && rows.insert(date, record).is_some() {
            debug!(broker = %record.broker, %date, "Duplicate row, keeping the last one");
        }
    }

    let mut filled = Vec::with_capacity(order.len() * axis.len());
    for broker in order {
        let rows = &by_broker[broker];
        let mut previous: Option<BrokerRecord> = None;
        let mut inserted = 0usize;

        for &day in &axis {
            let mut row = match rows.get(&day) {
                Some(&existing) => existing.clone(),
                None => {
                    inserted += 1;
                    BrokerRecord::placeholder(broker, day)
                }
            };
            if let Some(prev) = &previous {
                row.forward_fill_from(prev);
            }
            previous = Some(row.clone());
            filled.push(row);
        }
        debug!(broker, inserted, "Filled missing business days");
    }

    filled
}
