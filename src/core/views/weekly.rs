//! Weekly net trading activity.

use super::top_traders::{RankedBroker, rank_net, volumes_by_broker};
use crate::core::record::BrokerRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyActivity {
    /// Saturday opening the week.
    pub week_start: NaiveDate,
    /// Friday closing the week.
    pub week_end: NaiveDate,
    pub buyers: Vec<RankedBroker>,
    pub sellers: Vec<RankedBroker>,
}

/// Start of the Saturday–Friday week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let since_saturday = (date.weekday().num_days_from_monday() as i64 - 5).rem_euclid(7);
    date - Duration::days(since_saturday)
}

/// Net volume leaders for the `weeks` most recent weeks with data, newest
/// first.
pub fn recent_weeks(records: &[BrokerRecord], weeks: usize, top_n: usize) -> Vec<WeeklyActivity> {
    let mut by_week: BTreeMap<NaiveDate, Vec<&BrokerRecord>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            by_week.entry(week_start(date)).or_default().push(record);
        }
    }

    by_week
        .into_iter()
        .rev()
        .take(weeks)
        .map(|(start, rows)| {
            let totals = volumes_by_broker(rows);
            let (buyers, sellers) = rank_net(&totals, top_n);
            WeeklyActivity {
                week_start: start,
                week_end: start + Duration::days(6),
                buyers,
                sellers,
            }
        })
        .collect()
}
