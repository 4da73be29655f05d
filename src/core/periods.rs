//! Reporting period resolution anchored on closed business weeks.

use crate::core::error::PeriodError;
use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Preset {
    LastClosedWeek,
    Last4Weeks,
    Last3Months,
    Last12Months,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::LastClosedWeek,
        Preset::Last4Weeks,
        Preset::Last3Months,
        Preset::Last12Months,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Preset::LastClosedWeek => "Last closed week",
            Preset::Last4Weeks => "Last 4 weeks",
            Preset::Last3Months => "Last 3 months",
            Preset::Last12Months => "Last 12 months",
        }
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Preset {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last closed week" | "last-closed-week" | "1w" => Ok(Preset::LastClosedWeek),
            "last 4 weeks" | "last-4-weeks" | "4w" => Ok(Preset::Last4Weeks),
            "last 3 months" | "last-3-months" | "3m" => Ok(Preset::Last3Months),
            "last 12 months" | "last-12-months" | "12m" => Ok(Preset::Last12Months),
            _ => Err(PeriodError::UnknownPreset(s.to_string())),
        }
    }
}

/// Inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds")]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct IntervalBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<IntervalBounds> for DateInterval {
    type Error = PeriodError;

    fn try_from(bounds: IntervalBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidArgument(format!(
                "interval start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl Display for DateInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Latest valid date of a dataset date column, ignoring unparsed entries.
pub fn max_date(dates: &[Option<NaiveDate>]) -> Option<NaiveDate> {
    dates.iter().flatten().max().copied()
}

/// Monday–Friday week ending on the last Friday on or before the newest date
/// in `dates`. `None` when the column holds no valid date, or when that week
/// would start before the earliest representable day.
pub fn last_closed_week_from_data(dates: &[Option<NaiveDate>]) -> Option<DateInterval> {
    let max_date = max_date(dates)?;

    let back = (max_date.weekday().num_days_from_monday() as i64 - 4).rem_euclid(7);
    let mut friday = max_date.checked_sub_days(Days::new(back as u64))?;
    if friday > max_date {
        friday = friday.checked_sub_days(Days::new(7))?;
    }
    let monday = friday.checked_sub_days(Days::new(4))?;

    debug!(%max_date, %monday, %friday, "Resolved last closed week from data");
    Some(DateInterval {
        start: monday,
        end: friday,
    })
}

/// Resolves preset windows against a fixed reference day.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    today: NaiveDate,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodResolver {
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Monday–Friday of the week before the current calendar week.
    pub fn last_closed_week_from_calendar(&self) -> Result<DateInterval, PeriodError> {
        let days_since_monday = self.today.weekday().num_days_from_monday() as u64;
        let monday = days_before(self.today, days_since_monday + 7)?;
        Ok(DateInterval {
            start: monday,
            end: monday + Days::new(4),
        })
    }

    fn anchor_week(
        &self,
        dates: Option<&[Option<NaiveDate>]>,
    ) -> Result<Option<DateInterval>, PeriodError> {
        match dates {
            Some(dates) => Ok(last_closed_week_from_data(dates)),
            None => self.last_closed_week_from_calendar().map(Some),
        }
    }

    /// `n` back-to-back Monday–Friday weeks ending at the last closed week.
    pub fn n_weeks_range(
        &self,
        n: u32,
        dates: Option<&[Option<NaiveDate>]>,
    ) -> Result<Option<DateInterval>, PeriodError> {
        if n == 0 {
            return Err(PeriodError::InvalidArgument(
                "week count must be positive".to_string(),
            ));
        }
        let Some(week) = self.anchor_week(dates)? else {
            return Ok(None);
        };
        Ok(Some(DateInterval {
            start: days_before(week.start, 7 * (u64::from(n) - 1))?,
            end: week.end,
        }))
    }

    /// Current window for `preset`. `Ok(None)` means the dataset has no usable
    /// dates.
    pub fn resolve(
        &self,
        preset: Preset,
        dates: Option<&[Option<NaiveDate>]>,
    ) -> Result<Option<DateInterval>, PeriodError> {
        let resolved = match preset {
            Preset::LastClosedWeek => {
                let dates = dates.ok_or_else(|| {
                    PeriodError::InvalidArgument(format!("'{preset}' requires a dataset"))
                })?;
                last_closed_week_from_data(dates)
            }
            Preset::Last4Weeks => self.n_weeks_range(4, dates)?,
            Preset::Last3Months => self.months_back_from_anchor(3, dates)?,
            Preset::Last12Months => self.months_back_from_anchor(12, dates)?,
        };

        match &resolved {
            Some(interval) => debug!(%preset, %interval, "Resolved preset"),
            None => debug!(%preset, "No anchor week, dataset has no valid dates"),
        }
        Ok(resolved)
    }

    fn months_back_from_anchor(
        &self,
        months: u32,
        dates: Option<&[Option<NaiveDate>]>,
    ) -> Result<Option<DateInterval>, PeriodError> {
        let Some(anchor) = self.anchor_week(dates)? else {
            return Ok(None);
        };
        Ok(Some(DateInterval {
            start: months_before(anchor.end, months)?,
            end: anchor.end,
        }))
    }
}

/// Window of matching length immediately before `current`. `None` is a custom
/// range and mirrors its exact day count. Bounds that would fall before the
/// earliest representable day are clamped to it.
pub fn previous_equivalent_window(preset: Option<Preset>, current: DateInterval) -> DateInterval {
    let back = |date: NaiveDate, days: u64| days_before(date, days).unwrap_or(NaiveDate::MIN);
    let month_back = |date: NaiveDate, months: u32| {
        months_before(date, months).map_or(NaiveDate::MIN, |d| d + Days::new(1))
    };

    let prev_end = back(current.start, 1);
    let prev_start = match preset {
        Some(Preset::LastClosedWeek) => back(prev_end, 4),
        Some(Preset::Last4Weeks) => back(prev_end, 27),
        Some(Preset::Last3Months) => month_back(prev_end, 3),
        Some(Preset::Last12Months) => month_back(prev_end, 12),
        None => back(prev_end, (current.num_days() - 1) as u64),
    };
    DateInterval {
        start: prev_start,
        end: prev_end,
    }
}

fn out_of_range(date: NaiveDate) -> PeriodError {
    PeriodError::InvalidArgument(format!(
        "window before {date} reaches past the earliest supported date"
    ))
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_days(Days::new(days)).ok_or_else(|| out_of_range(date))
}

// Day of month is clamped to the target month's length.
fn months_before(date: NaiveDate, months: u32) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_months(Months::new(months)).ok_or_else(|| out_of_range(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn column(dates: &[&str]) -> Vec<Option<NaiveDate>> {
        dates.iter().map(|s| Some(d(s))).collect()
    }

    fn interval(start: &str, end: &str) -> DateInterval {
        DateInterval::new(d(start), d(end)).unwrap()
    }

    #[test]
    fn test_last_closed_week_from_data_midweek() {
        let dates = column(&["2024-03-18", "2024-03-20", "2024-03-19"]);
        let week = last_closed_week_from_data(&dates).unwrap();
        assert_eq!(week, interval("2024-03-11", "2024-03-15"));
    }

    #[test]
    fn test_last_closed_week_from_data_on_friday_and_weekend() {
        let friday = last_closed_week_from_data(&column(&["2024-03-15"])).unwrap();
        assert_eq!(friday, interval("2024-03-11", "2024-03-15"));

        let sunday = last_closed_week_from_data(&column(&["2024-03-17"])).unwrap();
        assert_eq!(sunday, interval("2024-03-11", "2024-03-15"));

        let thursday = last_closed_week_from_data(&column(&["2024-03-14"])).unwrap();
        assert_eq!(thursday, interval("2024-03-04", "2024-03-08"));
    }

    #[test]
    fn test_last_closed_week_is_always_monday_to_friday() {
        let mut day = d("2023-12-25");
        for _ in 0..21 {
            let week = last_closed_week_from_data(&[Some(day)]).unwrap();
            assert_eq!(week.start().weekday(), Weekday::Mon);
            assert_eq!(week.end().weekday(), Weekday::Fri);
            assert_eq!((week.end() - week.start()).num_days(), 4);
            assert!(week.end() <= day);
            day += Duration::days(1);
        }
    }

    #[test]
    fn test_last_closed_week_without_valid_dates() {
        assert!(last_closed_week_from_data(&[]).is_none());
        assert!(last_closed_week_from_data(&[None, None]).is_none());

        let mixed = vec![None, Some(d("2024-03-20")), None];
        assert_eq!(
            last_closed_week_from_data(&mixed),
            Some(interval("2024-03-11", "2024-03-15"))
        );
    }

    #[test]
    fn test_last_closed_week_from_calendar() {
        let resolver = PeriodResolver::at(d("2024-03-20"));
        assert_eq!(
            resolver.last_closed_week_from_calendar().unwrap(),
            interval("2024-03-11", "2024-03-15")
        );

        // A Monday still points at the week before last.
        let resolver = PeriodResolver::at(d("2024-03-18"));
        assert_eq!(
            resolver.last_closed_week_from_calendar().unwrap(),
            interval("2024-03-11", "2024-03-15")
        );

        let resolver = PeriodResolver::at(d("2024-03-17"));
        assert_eq!(
            resolver.last_closed_week_from_calendar().unwrap(),
            interval("2024-03-04", "2024-03-08")
        );
    }

    #[test]
    fn test_n_weeks_range() {
        let resolver = PeriodResolver::at(d("2030-01-01"));
        let dates = column(&["2024-03-15"]);

        let four = resolver.n_weeks_range(4, Some(&dates)).unwrap().unwrap();
        assert_eq!(four, interval("2024-02-19", "2024-03-15"));

        let one = resolver.n_weeks_range(1, Some(&dates)).unwrap().unwrap();
        assert_eq!(one, interval("2024-03-11", "2024-03-15"));

        assert!(resolver.n_weeks_range(4, Some(&[])).unwrap().is_none());
        assert!(matches!(
            resolver.n_weeks_range(0, Some(&dates)),
            Err(PeriodError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_n_weeks_range_from_calendar() {
        let resolver = PeriodResolver::at(d("2024-03-20"));
        let range = resolver.n_weeks_range(2, None).unwrap().unwrap();
        assert_eq!(range, interval("2024-03-04", "2024-03-15"));
    }

    #[test]
    fn test_resolve_presets_from_data() {
        let resolver = PeriodResolver::at(d("2030-01-01"));
        let dates = column(&["2024-01-02", "2024-03-20"]);

        let cases = [
            (Preset::LastClosedWeek, "2024-03-11", "2024-03-15"),
            (Preset::Last4Weeks, "2024-02-19", "2024-03-15"),
            (Preset::Last3Months, "2023-12-15", "2024-03-15"),
            (Preset::Last12Months, "2023-03-15", "2024-03-15"),
        ];
        for (preset, start, end) in cases {
            let resolved = resolver.resolve(preset, Some(&dates)).unwrap().unwrap();
            assert_eq!(resolved, interval(start, end), "preset {preset}");
            assert!(resolved.end() <= d("2024-03-20"));
        }
    }

    #[test]
    fn test_resolve_month_subtraction_clamps() {
        let resolver = PeriodResolver::at(d("2030-01-01"));
        // Anchor Friday 2024-05-31 minus three months lands on Feb 29.
        let dates = column(&["2024-05-31"]);
        let resolved = resolver
            .resolve(Preset::Last3Months, Some(&dates))
            .unwrap()
            .unwrap();
        assert_eq!(resolved, interval("2024-02-29", "2024-05-31"));
    }

    #[test]
    fn test_resolve_without_dataset() {
        let resolver = PeriodResolver::at(d("2024-03-20"));

        let err = resolver.resolve(Preset::LastClosedWeek, None).unwrap_err();
        assert!(matches!(err, PeriodError::InvalidArgument(_)));

        let resolved = resolver.resolve(Preset::Last12Months, None).unwrap();
        assert_eq!(resolved, Some(interval("2023-03-15", "2024-03-15")));
    }

    #[test]
    fn test_resolve_empty_dataset_is_no_data() {
        let resolver = PeriodResolver::at(d("2024-03-20"));
        let empty: Vec<Option<NaiveDate>> = vec![None];
        for preset in Preset::ALL {
            assert_eq!(resolver.resolve(preset, Some(&empty)).unwrap(), None);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = PeriodResolver::at(d("2024-06-01"));
        let dates = column(&["2024-04-09"]);
        for preset in Preset::ALL {
            assert_eq!(
                resolver.resolve(preset, Some(&dates)).unwrap(),
                resolver.resolve(preset, Some(&dates)).unwrap()
            );
        }
    }

    #[test]
    fn test_previous_equivalent_window() {
        let prev = previous_equivalent_window(
            Some(Preset::Last3Months),
            interval("2024-01-01", "2024-03-31"),
        );
        assert_eq!(prev, interval("2023-10-01", "2023-12-31"));

        let prev = previous_equivalent_window(
            Some(Preset::LastClosedWeek),
            interval("2024-03-11", "2024-03-15"),
        );
        assert_eq!(prev, interval("2024-03-06", "2024-03-10"));

        let prev = previous_equivalent_window(
            Some(Preset::Last4Weeks),
            interval("2024-02-19", "2024-03-15"),
        );
        assert_eq!(prev, interval("2024-01-22", "2024-02-18"));
        assert_eq!(prev.num_days(), 28);

        let prev = previous_equivalent_window(
            Some(Preset::Last12Months),
            interval("2023-03-15", "2024-03-15"),
        );
        assert_eq!(prev, interval("2022-03-15", "2023-03-14"));
    }

    #[test]
    fn test_previous_window_for_custom_range_mirrors_length() {
        let current = interval("2024-03-04", "2024-03-13");
        let prev = previous_equivalent_window(None, current);
        assert_eq!(prev, interval("2024-02-23", "2024-03-03"));
        assert_eq!(prev.num_days(), current.num_days());
    }

    #[test]
    fn test_previous_window_abuts_current() {
        let current = interval("2024-02-29", "2024-05-31");
        let presets = [
            None,
            Some(Preset::LastClosedWeek),
            Some(Preset::Last4Weeks),
            Some(Preset::Last3Months),
            Some(Preset::Last12Months),
        ];
        for preset in presets {
            let prev = previous_equivalent_window(preset, current);
            assert!(prev.start() <= prev.end());
            assert_eq!((current.start() - prev.end()).num_days(), 1);
        }
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Last closed week".parse::<Preset>().unwrap(), Preset::LastClosedWeek);
        assert_eq!("LAST 4 WEEKS".parse::<Preset>().unwrap(), Preset::Last4Weeks);
        assert_eq!("3m".parse::<Preset>().unwrap(), Preset::Last3Months);
        assert_eq!("last-12-months".parse::<Preset>().unwrap(), Preset::Last12Months);
        for preset in Preset::ALL {
            assert_eq!(preset.label().parse::<Preset>().unwrap(), preset);
        }

        let err = "Last 6 months".parse::<Preset>().unwrap_err();
        assert!(matches!(err, PeriodError::UnknownPreset(ref name) if name == "Last 6 months"));
    }

    #[test]
    fn test_windows_near_earliest_date() {
        let resolver = PeriodResolver::at(d("2024-03-20"));
        assert!(matches!(
            resolver.n_weeks_range(20_000_000, None),
            Err(PeriodError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolver.n_weeks_range(u32::MAX, Some(&column(&["2024-03-15"]))),
            Err(PeriodError::InvalidArgument(_))
        ));

        let earliest = PeriodResolver::at(NaiveDate::MIN);
        assert!(earliest.last_closed_week_from_calendar().is_err());
        assert!(earliest.resolve(Preset::Last12Months, None).is_err());
        assert_eq!(last_closed_week_from_data(&[Some(NaiveDate::MIN)]), None);

        let start = NaiveDate::MIN;
        let first_days = DateInterval::new(start, start + Duration::days(3)).unwrap();
        let floor = DateInterval::new(start, start).unwrap();
        for preset in [None, Some(Preset::LastClosedWeek), Some(Preset::Last3Months)] {
            assert_eq!(previous_equivalent_window(preset, first_days), floor);
        }
    }

    #[test]
    fn test_interval_deserialization_checks_bounds() {
        let interval: DateInterval =
            serde_json::from_str(r#"{"start":"2024-03-01","end":"2024-03-02"}"#).unwrap();
        assert_eq!(interval.num_days(), 2);

        let inverted =
            serde_json::from_str::<DateInterval>(r#"{"start":"2024-03-02","end":"2024-03-01"}"#);
        assert!(inverted.unwrap_err().to_string().contains("after end"));
    }

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        assert!(DateInterval::new(d("2024-03-02"), d("2024-03-01")).is_err());
        let single = interval("2024-03-01", "2024-03-01");
        assert_eq!(single.num_days(), 1);
        assert!(single.contains(d("2024-03-01")));
        assert!(!single.contains(d("2024-03-02")));
    }
}
