//! Top buyers and sellers by traded volume.

use crate::core::record::BrokerRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum RankMode {
    /// Total buy and sell volumes
    #[default]
    Gross,
    /// Buy minus sell volume
    Net,
}

impl Display for RankMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankMode::Gross => write!(f, "Gross Volume"),
            RankMode::Net => write!(f, "Net Volume"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBroker {
    pub broker: String,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopTraders {
    pub mode: RankMode,
    pub buyers: Vec<RankedBroker>,
    /// Seller volumes are negative.
    pub sellers: Vec<RankedBroker>,
}

/// Summed `(buy, sell)` volume per broker, keyed by broker name.
pub(crate) fn volumes_by_broker<'a, I>(records: I) -> BTreeMap<&'a str, (f64, f64)>
where
    I: IntoIterator<Item = &'a BrokerRecord>,
{
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.broker.as_str()).or_default();
        entry.0 += record.buy_volume.unwrap_or(0.0);
        entry.1 += record.sell_volume.unwrap_or(0.0);
    }
    totals
}

/// Strongest `top_n` positive and negative net volumes of `totals`.
pub(crate) fn rank_net(
    totals: &BTreeMap<&str, (f64, f64)>,
    top_n: usize,
) -> (Vec<RankedBroker>, Vec<RankedBroker>) {
    let net = totals.iter().map(|(broker, (buy, sell))| RankedBroker {
        broker: broker.to_string(),
        volume: buy - sell,
    });
    let buyers = take_sorted(net.clone().filter(|r| r.volume > 0.0), top_n, true);
    let sellers = take_sorted(net.filter(|r| r.volume < 0.0), top_n, false);
    (buyers, sellers)
}

fn take_sorted<I>(rows: I, top_n: usize, descending: bool) -> Vec<RankedBroker>
where
    I: Iterator<Item = RankedBroker>,
{
    let mut rows: Vec<RankedBroker> = rows.collect();
    rows.sort_by(|a, b| {
        let ord = a.volume.total_cmp(&b.volume);
        if descending { ord.reverse() } else { ord }
    });
    rows.truncate(top_n);
    rows
}

pub fn rank(records: &[BrokerRecord], mode: RankMode, top_n: usize) -> TopTraders {
    let totals = volumes_by_broker(records);

    let (buyers, sellers) = match mode {
        RankMode::Gross => {
            let buyers = take_sorted(
                totals.iter().map(|(broker, (buy, _))| RankedBroker {
                    broker: broker.to_string(),
                    volume: *buy,
                }),
                top_n,
                true,
            );
            let sellers = take_sorted(
                totals.iter().map(|(broker, (_, sell))| RankedBroker {
                    broker: broker.to_string(),
                    volume: -sell,
                }),
                top_n,
                false,
            );
            (buyers, sellers)
        }
        RankMode::Net => rank_net(&totals, top_n),
    };

    TopTraders {
        mode,
        buyers,
        sellers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(broker: &str, day: u32, buy: f64, sell: f64) -> BrokerRecord {
        BrokerRecord {
            buy_volume: Some(buy),
            sell_volume: Some(sell),
            ..BrokerRecord::placeholder(broker, NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
        }
    }

    fn names(rows: &[RankedBroker]) -> Vec<&str> {
        rows.iter().map(|r| r.broker.as_str()).collect()
    }

    fn sample() -> Vec<BrokerRecord> {
        vec![
            row("XP", 18, 100.0, 10.0),
            row("XP", 19, 50.0, 0.0),
            row("BTG", 18, 20.0, 300.0),
            row("ITAU", 18, 80.0, 90.0),
            row("UBS", 18, 10.0, 5.0),
        ]
    }

    #[test]
    fn test_rank_gross() {
        let top = rank(&sample(), RankMode::Gross, 2);
        assert_eq!(names(&top.buyers), vec!["XP", "ITAU"]);
        assert_eq!(top.buyers[0].volume, 150.0);
        assert_eq!(names(&top.sellers), vec!["BTG", "ITAU"]);
        assert_eq!(top.sellers[0].volume, -300.0);
    }

    #[test]
    fn test_rank_net_excludes_wrong_sign() {
        let top = rank(&sample(), RankMode::Net, 5);
        assert_eq!(names(&top.buyers), vec!["XP", "UBS"]);
        assert_eq!(top.buyers[0].volume, 140.0);
        assert_eq!(names(&top.sellers), vec!["BTG", "ITAU"]);
        assert_eq!(top.sellers[0].volume, -280.0);
    }

    #[test]
    fn test_rank_empty() {
        let top = rank(&[], RankMode::Net, 5);
        assert!(top.buyers.is_empty());
        assert!(top.sellers.is_empty());
    }
}
