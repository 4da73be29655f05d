//! Buyer/seller classification from custody movement.

use super::custody::{BrokerBalance, DailySnapshot, consolidate};
use super::mean;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Buyer,
    Seller,
    Neutral,
}

impl Category {
    pub fn from_change(total_change: Option<f64>) -> Self {
        match total_change {
            Some(change) if change > 0.0 => Category::Buyer,
            Some(change) if change < 0.0 => Category::Seller,
            _ => Category::Neutral,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Buyer => "Buyer",
            Category::Seller => "Seller",
            Category::Neutral => "Neutral",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedBroker {
    #[serde(flatten)]
    pub balance: BrokerBalance,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuyersSellersSummary {
    pub brokers: Vec<ClassifiedBroker>,
    pub broker_count: usize,
    pub avg_variation_pct: Option<f64>,
    pub top_buyer: Option<ClassifiedBroker>,
    pub top_seller: Option<ClassifiedBroker>,
}

pub fn summarize(
    snapshots: &[DailySnapshot],
    broker: Option<&str>,
) -> Option<BuyersSellersSummary> {
    let classified: Vec<ClassifiedBroker> = consolidate(snapshots)
        .into_iter()
        .map(|balance| ClassifiedBroker {
            category: Category::from_change(balance.balance.total_change),
            balance,
        })
        .collect();
    if classified.is_empty() {
        return None;
    }

    let change = |b: &&ClassifiedBroker| b.balance.balance.total_change;
    let with_change: Vec<&ClassifiedBroker> =
        classified.iter().filter(|b| change(b).is_some()).collect();
    let cmp = |a: &&ClassifiedBroker, b: &&ClassifiedBroker| {
        change(a).unwrap_or(0.0).total_cmp(&change(b).unwrap_or(0.0))
    };
    let top_buyer = with_change.iter().copied().max_by(cmp).cloned();
    let top_seller = with_change.iter().copied().min_by(cmp).cloned();

    Some(BuyersSellersSummary {
        broker_count: classified.len(),
        avg_variation_pct: mean(classified.iter().map(|b| b.balance.balance.variation_pct)),
        top_buyer,
        top_seller,
        brokers: classified
            .into_iter()
            .filter(|b| broker.is_none_or(|name| b.balance.broker == name))
            .collect(),
    })
}
