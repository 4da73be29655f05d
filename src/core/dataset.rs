//! Broker daily CSV loading.

use crate::core::record::BrokerRecord;
use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a date cell, keeping only the calendar day. `None` when no known
/// format matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

struct Columns {
    date: usize,
    broker: usize,
    buy_volume: Option<usize>,
    sell_volume: Option<usize>,
    start_balance: Option<usize>,
    end_balance: Option<usize>,
    anon_volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let Some(date) = find("date") else {
            bail!("Missing required column: date");
        };
        let Some(broker) = find("broker") else {
            bail!("Missing required column: broker");
        };

        Ok(Self {
            date,
            broker,
            buy_volume: find("buy_volume"),
            sell_volume: find("sell_volume"),
            start_balance: find("start_balance"),
            end_balance: find("end_balance"),
            anon_volume: find("anon_volume"),
        })
    }
}

/// Loads the broker daily dataset from a CSV file.
///
/// Column names are matched after trimming and lowercasing. Unparseable
/// dates and numbers become `None` instead of failing the load. When the file
/// has no `anon_volume` column every row gets zero, and `anonymous` is set
/// from `anon_volume > 0`.
pub fn load_broker_data<P: AsRef<Path>>(path: P) -> Result<Vec<BrokerRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut bad_dates = 0usize;
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read row {} of dataset", line + 2))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i));
        let number = |idx: Option<usize>| cell(idx).and_then(parse_number);

        let raw_date = row.get(columns.date).unwrap_or_default();
        let date = parse_date(raw_date);
        if date.is_none() {
            bad_dates += 1;
            debug!(line = line + 2, raw_date, "Unparseable date, keeping row without date");
        }

        let anon_volume = if columns.anon_volume.is_some() {
            number(columns.anon_volume)
        } else {
            Some(0.0)
        };

        records.push(BrokerRecord {
            date,
            broker: row.get(columns.broker).unwrap_or_default().to_string(),
            buy_volume: number(columns.buy_volume),
            sell_volume: number(columns.sell_volume),
            start_balance: number(columns.start_balance),
            end_balance: number(columns.end_balance),
            anon_volume,
            anonymous: Some(anon_volume.is_some_and(|v| v > 0.0)),
        });
    }

    info!(
        rows = records.len(),
        bad_dates,
        path = %path.display(),
        "Loaded broker dataset"
    );
    Ok(records)
}
