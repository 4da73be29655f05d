use super::context::{Dashboard, PeriodSelection, no_data_message};
use super::ui;
use crate::core::fill::business_days;
use crate::core::periods::DateInterval;
use anyhow::Result;
use comfy_table::Cell;
use serde_json::json;

fn window_row(name: &str, interval: &DateInterval) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(interval.start().to_string()),
        Cell::new(interval.end().to_string()),
        Cell::new(interval.num_days()),
        Cell::new(business_days(interval.start(), interval.end()).len()),
    ]
}

pub fn render(selection: &PeriodSelection) -> String {
    let (Some(current), Some(previous)) = (&selection.current, &selection.previous) else {
        return no_data_message();
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Window"),
        ui::header_cell("Start"),
        ui::header_cell("End"),
        ui::header_cell("Days"),
        ui::header_cell("Business Days"),
    ]);
    table.add_row(window_row("Current", current));
    table.add_row(window_row("Previous", previous));

    format!(
        "Period: {}\n\n{table}",
        ui::style_text(&selection.label(), ui::StyleType::Label)
    )
}

pub fn render_json(selection: &PeriodSelection) -> Result<String> {
    let value = json!({
        "preset": selection.preset.map(|p| p.label()),
        "current": selection.current,
        "previous": selection.previous,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn run(dashboard: &Dashboard, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", render_json(&dashboard.period)?);
    } else {
        println!("{}", render(&dashboard.period));
    }
    Ok(())
}
