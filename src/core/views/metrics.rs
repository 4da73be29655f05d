//! Headline figures for a period compared with the previous one.

use crate::core::record::BrokerRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub net_volume: f64,
    pub anon_volume: f64,
    pub active_brokers: usize,
    pub custody: f64,
    pub trading_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub current: f64,
    pub previous: Option<f64>,
    pub change_pct: Option<f64>,
}

impl Metric {
    fn new(label: &'static str, current: f64, previous: Option<f64>) -> Self {
        let change_pct = previous
            .filter(|p| *p != 0.0)
            .map(|p| (current - p) / p.abs() * 100.0);
        Self {
            label,
            current,
            previous,
            change_pct,
        }
    }
}

/// Totals over `records`. Custody is the sum of each broker's last defined
/// closing balance.
pub fn period_totals(records: &[BrokerRecord]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    let mut active = BTreeSet::new();
    let mut days = BTreeSet::new();
    let mut closing: BTreeMap<&str, (chrono::NaiveDate, f64)> = BTreeMap::new();

    for record in records {
        let buy = record.buy_volume.unwrap_or(0.0);
        let sell = record.sell_volume.unwrap_or(0.0);
        totals.buy_volume += buy;
        totals.sell_volume += sell;
        totals.anon_volume += record.anon_volume.unwrap_or(0.0);
        if buy + sell > 0.0 {
            active.insert(record.broker.as_str());
        }
        if let Some(date) = record.date {
            days.insert(date);
            if let Some(end) = record.end_balance {
                let slot = closing.entry(record.broker.as_str()).or_insert((date, end));
                if date >= slot.0 {
                    *slot = (date, end);
                }
            }
        }
    }

    totals.net_volume = totals.buy_volume - totals.sell_volume;
    totals.active_brokers = active.len();
    totals.trading_days = days.len();
    totals.custody = closing.values().map(|(_, end)| end).sum();
    totals
}

/// Metric cards for the current period. Without previous rows there is
/// nothing to compare against and `previous` stays `None`.
pub fn compute_metrics(current: &[BrokerRecord], previous: &[BrokerRecord]) -> Vec<Metric> {
    let cur = period_totals(current);
    let prev = (!previous.is_empty()).then(|| period_totals(previous));
    let prev_of = |f: fn(&PeriodTotals) -> f64| prev.as_ref().map(f);

    vec![
        Metric::new("Buy Volume", cur.buy_volume, prev_of(|t| t.buy_volume)),
        Metric::new("Sell Volume", cur.sell_volume, prev_of(|t| t.sell_volume)),
        Metric::new("Net Volume", cur.net_volume, prev_of(|t| t.net_volume)),
        Metric::new("Anonymous Volume", cur.anon_volume, prev_of(|t| t.anon_volume)),
        Metric::new(
            "Active Brokers",
            cur.active_brokers as f64,
            prev_of(|t| t.active_brokers as f64),
        ),
        Metric::new("Custody", cur.custody, prev_of(|t| t.custody)),
        Metric::new(
            "Trading Days",
            cur.trading_days as f64,
            prev_of(|t| t.trading_days as f64),
        ),
    ]
}
