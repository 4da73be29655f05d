use super::context::{Dashboard, no_data_message};
use super::ui;
use crate::core::views::top_traders::{RankMode, RankedBroker, TopTraders, rank};
use anyhow::Result;
use comfy_table::Cell;

pub(super) fn ranking_table(rows: &[RankedBroker]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Broker"),
        ui::header_cell("Volume"),
    ]);
    for (i, row) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&row.broker),
            ui::signed_cell(row.volume, ui::format_compact(row.volume)),
        ]);
    }
    table.to_string()
}

pub fn render(top: &TopTraders, top_n: usize) -> String {
    let mut output = String::new();
    for (side, rows) in [("Buyers", &top.buyers), ("Sellers", &top.sellers)] {
        let title = format!("Top {top_n} {side} – {}", top.mode);
        output.push_str(&format!("{}\n", ui::style_text(&title, ui::StyleType::Title)));
        if rows.is_empty() {
            output.push_str(&ui::style_text("No brokers on this side.", ui::StyleType::Subtle));
        } else {
            output.push_str(&ranking_table(rows));
        }
        output.push_str("\n\n");
    }
    output.trim_end().to_string()
}

pub fn report(dashboard: &Dashboard, mode: RankMode, top_n: usize) -> String {
    let rows = dashboard
        .period
        .current
        .as_ref()
        .map(|current| dashboard.trades_in(current))
        .unwrap_or_default();

    let body = if rows.is_empty() {
        no_data_message()
    } else {
        render(&rank(&rows, mode, top_n), top_n)
    };
    format!("{}\n\n{body}", dashboard.heading("Top Buyers & Sellers"))
}

pub fn run(dashboard: &Dashboard, mode: RankMode, top_n: usize) -> Result<()> {
    println!("{}", report(dashboard, mode, top_n));
    Ok(())
}
