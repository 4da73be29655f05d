use super::context::{Dashboard, no_data_message};
use super::ui;
use crate::core::views::custody::{BrokerBalance, CustodySummary, daily_snapshots, summarize};
use crate::core::views::BalanceChange;
use anyhow::Result;
use comfy_table::Cell;

/// Cells for the balance columns shared with the buyers & sellers table.
pub(super) fn balance_cells(balance: &BalanceChange) -> Vec<Cell> {
    vec![
        ui::format_optional_cell(balance.start_balance, ui::format_thousands),
        ui::format_optional_cell(balance.end_balance, ui::format_thousands),
        match balance.total_change {
            Some(change) => ui::signed_cell(change, ui::format_thousands(change)),
            None => ui::na_cell(),
        },
        ui::change_cell(balance.variation_pct),
    ]
}

pub(super) fn balance_headers(first: &str) -> Vec<Cell> {
    vec![
        ui::header_cell(first),
        ui::header_cell("Start Balance"),
        ui::header_cell("End Balance"),
        ui::header_cell("Total Change"),
        ui::header_cell("Variation"),
    ]
}

fn describe(broker: &Option<BrokerBalance>) -> String {
    broker.as_ref().map_or("N/A".to_string(), |b| {
        let pct = b.balance.variation_pct.unwrap_or(0.0);
        format!("{} ({pct:.2}%)", b.broker)
    })
}

pub fn render(summary: &CustodySummary) -> String {
    let avg = summary
        .avg_variation_pct
        .map_or("N/A".to_string(), |v| format!("{v:.2}%"));
    let mut output = format!(
        "Brokers: {}\nAvg. Variation: {}\nTop Gain: {}\nTop Loss: {}\n\n",
        ui::style_text(&summary.broker_count.to_string(), ui::StyleType::Label),
        ui::style_text(&avg, ui::StyleType::Label),
        ui::style_text(&describe(&summary.top_gain), ui::StyleType::Positive),
        ui::style_text(&describe(&summary.top_loss), ui::StyleType::Negative),
    );

    let mut table = ui::new_styled_table();
    table.set_header(balance_headers("Broker"));
    for broker in &summary.brokers {
        let mut row = vec![Cell::new(&broker.broker)];
        row.extend(balance_cells(&broker.balance));
        table.add_row(row);
    }
    output.push_str(&table.to_string());
    output
}

/// Custody changes over the selected period, taken from the business-day
/// calendar so balances carry across days without activity.
pub fn report(dashboard: &Dashboard, broker: Option<&str>) -> String {
    let summary = dashboard
        .period
        .current
        .as_ref()
        .and_then(|current| summarize(&daily_snapshots(&dashboard.balances_in(current)), broker));

    let body = match summary {
        Some(summary) if !summary.brokers.is_empty() => render(&summary),
        _ => no_data_message(),
    };
    format!("{}\n\n{body}", dashboard.heading("Custody"))
}

pub fn run(dashboard: &Dashboard, broker: Option<&str>) -> Result<()> {
    println!("{}", report(dashboard, broker));
    Ok(())
}
