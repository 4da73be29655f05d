//! Row type of the broker daily dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily row for a broker. Numeric columns are `None` when the source
/// value was missing or malformed, or on a gap-filled day before the broker's
/// first observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BrokerRecord {
    pub date: Option<NaiveDate>,
    pub broker: String,
    pub buy_volume: Option<f64>,
    pub sell_volume: Option<f64>,
    pub start_balance: Option<f64>,
    pub end_balance: Option<f64>,
    pub anon_volume: Option<f64>,
    pub anonymous: Option<bool>,
}

impl BrokerRecord {
    /// Empty row for `broker` on `date`, used for days missing from the data.
    pub fn placeholder(broker: &str, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            broker: broker.to_string(),
            ..Default::default()
        }
    }

    /// Carries the numeric columns of `previous` into unset fields of `self`.
    pub(crate) fn forward_fill_from(&mut self, previous: &BrokerRecord) {
        fn carry(slot: &mut Option<f64>, prev: Option<f64>) {
            if slot.is_none() {
                *slot = prev;
            }
        }
        carry(&mut self.buy_volume, previous.buy_volume);
        carry(&mut self.sell_volume, previous.sell_volume);
        carry(&mut self.start_balance, previous.start_balance);
        carry(&mut self.end_balance, previous.end_balance);
        carry(&mut self.anon_volume, previous.anon_volume);
    }
}

/// Date reference column of `records`, one entry per row.
pub fn dates(records: &[BrokerRecord]) -> Vec<Option<NaiveDate>> {
    records.iter().map(|r| r.date).collect()
}

/// Rows whose date lies inside `interval`, both ends included.
pub fn filter_by_interval(
    records: &[BrokerRecord],
    interval: &crate::core::periods::DateInterval,
) -> Vec<BrokerRecord> {
    records
        .iter()
        .filter(|r| r.date.is_some_and(|d| interval.contains(d)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::periods::DateInterval;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_by_interval_is_inclusive() {
        let records: Vec<BrokerRecord> = ["2024-03-10", "2024-03-11", "2024-03-15", "2024-03-16"]
            .iter()
            .map(|s| BrokerRecord::placeholder("XP", d(s)))
            .chain(std::iter::once(BrokerRecord {
                broker: "XP".to_string(),
                ..Default::default()
            }))
            .collect();
        let interval = DateInterval::new(d("2024-03-11"), d("2024-03-15")).unwrap();

        let filtered = filter_by_interval(&records, &interval);
        let kept: Vec<_> = filtered.iter().filter_map(|r| r.date).collect();
        assert_eq!(kept, vec![d("2024-03-11"), d("2024-03-15")]);
    }

    #[test]
    fn test_forward_fill_only_touches_missing_numbers() {
        let previous = BrokerRecord {
            buy_volume: Some(10.0),
            sell_volume: Some(4.0),
            end_balance: Some(100.0),
            anonymous: Some(true),
            ..BrokerRecord::placeholder("XP", d("2024-01-02"))
        };
        let mut current = BrokerRecord {
            sell_volume: Some(7.0),
            ..BrokerRecord::placeholder("XP", d("2024-01-03"))
        };
        current.forward_fill_from(&previous);

        assert_eq!(current.buy_volume, Some(10.0));
        assert_eq!(current.sell_volume, Some(7.0));
        assert_eq!(current.end_balance, Some(100.0));
        assert_eq!(current.start_balance, None);
        assert_eq!(current.anonymous, None);
    }
}
