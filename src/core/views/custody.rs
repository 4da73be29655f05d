//! Custody balances per broker.

use super::{BalanceChange, first_last, mean};
use crate::core::record::BrokerRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySnapshot {
    pub broker: String,
    pub date: NaiveDate,
    pub balance: BalanceChange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerBalance {
    pub broker: String,
    pub balance: BalanceChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustodySummary {
    pub brokers: Vec<BrokerBalance>,
    pub broker_count: usize,
    pub avg_variation_pct: Option<f64>,
    pub top_gain: Option<BrokerBalance>,
    pub top_loss: Option<BrokerBalance>,
}

/// One snapshot per broker and day, ordered by broker then date. The opening
/// balance is the day's first defined one, the closing balance its last.
pub fn daily_snapshots(records: &[BrokerRecord]) -> Vec<DailySnapshot> {
    let mut groups: BTreeMap<(&str, NaiveDate), Vec<&BrokerRecord>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            groups
                .entry((record.broker.as_str(), date))
                .or_default()
                .push(record);
        }
    }

    groups
        .into_iter()
        .map(|((broker, date), rows)| DailySnapshot {
            broker: broker.to_string(),
            date,
            balance: first_last(rows.iter().map(|r| (r.start_balance, r.end_balance))),
        })
        .collect()
}

/// Consolidates daily snapshots into one opening/closing pair per broker.
pub fn consolidate(snapshots: &[DailySnapshot]) -> Vec<BrokerBalance> {
    let mut groups: BTreeMap<&str, Vec<&DailySnapshot>> = BTreeMap::new();
    for snapshot in snapshots {
        groups.entry(snapshot.broker.as_str()).or_default().push(snapshot);
    }

    groups
        .into_iter()
        .map(|(broker, mut rows)| {
            rows.sort_by_key(|s| s.date);
            BrokerBalance {
                broker: broker.to_string(),
                balance: first_last(
                    rows.iter()
                        .map(|s| (s.balance.start_balance, s.balance.end_balance)),
                ),
            }
        })
        .collect()
}

fn by_variation(a: &&BrokerBalance, b: &&BrokerBalance) -> std::cmp::Ordering {
    a.balance
        .variation_pct
        .unwrap_or(0.0)
        .total_cmp(&b.balance.variation_pct.unwrap_or(0.0))
}

/// Custody movement over the given snapshots. `broker` narrows the listed rows
/// without changing the overall statistics. `None` when there is nothing to
/// summarize.
pub fn summarize(snapshots: &[DailySnapshot], broker: Option<&str>) -> Option<CustodySummary> {
    let consolidated = consolidate(snapshots);
    if consolidated.is_empty() {
        return None;
    }

    let ranked: Vec<&BrokerBalance> = consolidated
        .iter()
        .filter(|b| b.balance.variation_pct.is_some())
        .collect();
    let top_gain = ranked.iter().copied().max_by(by_variation).cloned();
    let top_loss = ranked.iter().copied().min_by(by_variation).cloned();

    Some(CustodySummary {
        broker_count: consolidated.len(),
        avg_variation_pct: mean(consolidated.iter().map(|b| b.balance.variation_pct)),
        top_gain,
        top_loss,
        brokers: consolidated
            .into_iter()
            .filter(|b| broker.is_none_or(|name| b.broker == name))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(broker: &str, date: &str, start: f64, end: f64) -> BrokerRecord {
        BrokerRecord {
            start_balance: Some(start),
            end_balance: Some(end),
            ..BrokerRecord::placeholder(broker, d(date))
        }
    }

    #[test]
    fn test_daily_snapshots_take_first_start_and_last_end() {
        let records = vec![
            row("XP", "2024-03-18", 100.0, 110.0),
            row("XP", "2024-03-18", 110.0, 130.0),
            row("BTG", "2024-03-18", 50.0, 45.0),
        ];

        let snapshots = daily_snapshots(&records);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].broker, "BTG");
        let xp = &snapshots[1];
        assert_eq!(xp.balance.start_balance, Some(100.0));
        assert_eq!(xp.balance.end_balance, Some(130.0));
        assert_eq!(xp.balance.total_change, Some(30.0));
        assert_eq!(xp.balance.variation_pct, Some(30.0));
    }

    #[test]
    fn test_summarize_period() {
        let records = vec![
            row("XP", "2024-03-18", 100.0, 120.0),
            row("XP", "2024-03-19", 120.0, 150.0),
            row("BTG", "2024-03-18", 200.0, 190.0),
            row("BTG", "2024-03-19", 190.0, 180.0),
        ];
        let snapshots = daily_snapshots(&records);

        let summary = summarize(&snapshots, None).unwrap();
        assert_eq!(summary.broker_count, 2);
        assert_eq!(summary.brokers.len(), 2);
        assert_eq!(summary.top_gain.as_ref().unwrap().broker, "XP");
        assert_eq!(summary.top_loss.as_ref().unwrap().broker, "BTG");
        // XP +50%, BTG -10%
        assert!((summary.avg_variation_pct.unwrap() - 20.0).abs() < 1e-9);

        let filtered = summarize(&snapshots, Some("BTG")).unwrap();
        assert_eq!(filtered.brokers.len(), 1);
        assert_eq!(filtered.brokers[0].balance.total_change, Some(-20.0));
        assert_eq!(filtered.broker_count, 2);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[], None).is_none());
    }
}
