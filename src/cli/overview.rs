use super::context::{Dashboard, no_data_message};
use super::ui;
use crate::core::views::metrics::{Metric, compute_metrics};
use anyhow::Result;
use comfy_table::{Attribute, Cell, CellAlignment};

fn format_value(metric: &Metric, value: f64) -> String {
    match metric.label {
        "Active Brokers" | "Trading Days" => format!("{value:.0}"),
        _ => ui::format_thousands(value),
    }
}

pub fn render_metrics(metrics: &[Metric]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell("Current"),
        ui::header_cell("Previous"),
        ui::header_cell("Change"),
    ]);

    for metric in metrics {
        table.add_row(vec![
            Cell::new(metric.label).add_attribute(Attribute::Bold),
            Cell::new(format_value(metric, metric.current)).set_alignment(CellAlignment::Right),
            ui::format_optional_cell(metric.previous, |v| format_value(metric, v)),
            ui::change_cell(metric.change_pct),
        ]);
    }
    table.to_string()
}

/// Metrics of the selected period against the previous window, summed from
/// the raw rows.
pub fn report(dashboard: &Dashboard) -> String {
    let heading = dashboard.heading("Company View");
    let (Some(current), Some(previous)) = (&dashboard.period.current, &dashboard.period.previous)
    else {
        return format!("{heading}\n\n{}", no_data_message());
    };

    let current_rows = dashboard.trades_in(current);
    if current_rows.is_empty() {
        return format!("{heading}\n\n{}", no_data_message());
    }
    let metrics = compute_metrics(&current_rows, &dashboard.trades_in(previous));

    format!(
        "{heading}\n\n{}\n\n{}",
        render_metrics(&metrics),
        ui::style_text(&format!("Compared with {previous}"), ui::StyleType::Subtle)
    )
}

pub fn run(dashboard: &Dashboard) -> Result<()> {
    println!("{}", report(dashboard));
    Ok(())
}
