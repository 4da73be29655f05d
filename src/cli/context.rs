//! Dataset and reporting period shared by every dashboard view.

use super::ui;
use crate::core::config::AppConfig;
use crate::core::periods::{DateInterval, PeriodResolver, Preset, previous_equivalent_window};
use crate::core::record::{self, BrokerRecord};
use crate::core::{dataset, fill};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Period selection requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct PeriodRequest {
    pub preset: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Anchor presets on the last closed calendar week instead of the data.
    pub calendar: bool,
    /// Reference day for calendar anchoring, the current day when unset.
    pub today: Option<NaiveDate>,
}

/// Resolved current and previous windows. `current` is `None` when the
/// dataset has no usable dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSelection {
    /// `None` for a custom range.
    pub preset: Option<Preset>,
    pub current: Option<DateInterval>,
    pub previous: Option<DateInterval>,
}

impl PeriodSelection {
    pub fn label(&self) -> String {
        let name = self.preset.map_or("Custom range", |p| p.label());
        match &self.current {
            Some(current) => format!("{name} ({current})"),
            None => name.to_string(),
        }
    }
}

pub fn select_period(
    request: &PeriodRequest,
    default_preset: &str,
    dates: &[Option<NaiveDate>],
) -> Result<PeriodSelection> {
    let (preset, current) = match (request.from, request.to) {
        (Some(from), Some(to)) => (None, Some(DateInterval::new(from, to)?)),
        (None, None) => {
            let preset: Preset = request
                .preset
                .as_deref()
                .unwrap_or(default_preset)
                .parse()?;
            (Some(preset), resolve_preset(request, preset, dates)?)
        }
        _ => bail!("--from and --to must be given together"),
    };

    let previous = current.map(|c| previous_equivalent_window(preset, c));
    debug!(?preset, ?current, ?previous, "Selected period");
    Ok(PeriodSelection {
        preset,
        current,
        previous,
    })
}

fn resolve_preset(
    request: &PeriodRequest,
    preset: Preset,
    dates: &[Option<NaiveDate>],
) -> Result<Option<DateInterval>> {
    if !request.calendar {
        return Ok(PeriodResolver::new().resolve(preset, Some(dates))?);
    }

    let resolver = request.today.map_or_else(PeriodResolver::new, PeriodResolver::at);
    let current = match preset {
        Preset::LastClosedWeek => Some(resolver.last_closed_week_from_calendar()?),
        _ => resolver.resolve(preset, None)?,
    };
    Ok(current)
}

/// Loaded dataset plus the selected period.
pub struct Dashboard {
    pub config: AppConfig,
    /// Rows as loaded from the file.
    pub records: Vec<BrokerRecord>,
    /// Rows on the per-broker business-day calendar, or the raw rows when
    /// filling is disabled.
    pub calendar: Vec<BrokerRecord>,
    pub period: PeriodSelection,
}

impl Dashboard {
    pub fn load(
        config: AppConfig,
        data_path: Option<&str>,
        request: &PeriodRequest,
    ) -> Result<Self> {
        let path = data_path.unwrap_or(config.data_path.as_str()).to_string();

        let spinner = ui::new_spinner(&format!("Loading {path}"));
        let loaded = dataset::load_broker_data(&path);
        spinner.finish_and_clear();
        let records = loaded.with_context(|| format!("Failed to load broker data from {path}"))?;

        let calendar = if config.fill_business_days {
            fill::fill_missing_business_days(&records)
        } else {
            records.clone()
        };
        info!(
            raw = records.len(),
            calendar = calendar.len(),
            "Prepared broker calendar"
        );

        let period = select_period(request, &config.default_preset, &record::dates(&calendar))?;
        Ok(Self {
            config,
            records,
            calendar,
            period,
        })
    }

    /// Raw rows inside `interval`. Volumes are summed from these so that
    /// forward-filled days are not counted twice.
    pub fn trades_in(&self, interval: &DateInterval) -> Vec<BrokerRecord> {
        record::filter_by_interval(&self.records, interval)
    }

    /// Calendar rows inside `interval`, used for balances that persist across
    /// days without activity.
    pub fn balances_in(&self, interval: &DateInterval) -> Vec<BrokerRecord> {
        record::filter_by_interval(&self.calendar, interval)
    }

    pub fn heading(&self, section: &str) -> String {
        format!(
            "{} – {}",
            ui::style_text(section, ui::StyleType::Title),
            self.period.label()
        )
    }
}

pub fn no_data_message() -> String {
    ui::style_text(
        "No data available for the selected period.",
        ui::StyleType::Warning,
    )
}
