use super::context::{Dashboard, no_data_message};
use super::custody::{balance_cells, balance_headers};
use super::ui;
use crate::core::views::buyers_sellers::{
    BuyersSellersSummary, Category, ClassifiedBroker, summarize,
};
use crate::core::views::custody::daily_snapshots;
use anyhow::Result;
use comfy_table::{Cell, Color};

fn describe(broker: &Option<ClassifiedBroker>) -> String {
    broker.as_ref().map_or("N/A".to_string(), |b| {
        let change = b.balance.balance.total_change.unwrap_or(0.0);
        format!("{} ({})", b.balance.broker, ui::format_thousands(change))
    })
}

fn category_cell(category: Category) -> Cell {
    let cell = Cell::new(category.to_string());
    match category {
        Category::Buyer => cell.fg(Color::Green),
        Category::Seller => cell.fg(Color::Red),
        Category::Neutral => cell.fg(Color::DarkGrey),
    }
}

pub fn render(summary: &BuyersSellersSummary) -> String {
    let avg = summary
        .avg_variation_pct
        .map_or("N/A".to_string(), |v| format!("{v:.2}%"));
    let mut output = format!(
        "Brokers: {}\nAvg. Variation: {}\nTop Buyer: {}\nTop Seller: {}\n\n",
        ui::style_text(&summary.broker_count.to_string(), ui::StyleType::Label),
        ui::style_text(&avg, ui::StyleType::Label),
        ui::style_text(&describe(&summary.top_buyer), ui::StyleType::Positive),
        ui::style_text(&describe(&summary.top_seller), ui::StyleType::Negative),
    );

    let mut table = ui::new_styled_table();
    let mut header = balance_headers("Broker");
    header.push(ui::header_cell("Category"));
    table.set_header(header);
    for broker in &summary.brokers {
        let mut row = vec![Cell::new(&broker.balance.broker)];
        row.extend(balance_cells(&broker.balance.balance));
        row.push(category_cell(broker.category));
        table.add_row(row);
    }
    output.push_str(&table.to_string());
    output
}

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
    format!("{}\n\n{body}", dashboard.heading("Buyers & Sellers"))
}

pub fn run(dashboard: &Dashboard, broker: Option<&str>) -> Result<()> {
    println!("{}", report(dashboard, broker));
    Ok(())
}
