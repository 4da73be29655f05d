use super::context::{Dashboard, no_data_message};
use super::top::ranking_table;
use super::ui;
use crate::core::views::weekly::{WeeklyActivity, recent_weeks};
use anyhow::Result;

const WEEKS_SHOWN: usize = 4;

pub fn render(week: &WeeklyActivity) -> String {
    let title = format!("Week of {} – Net Volume", week.week_start.format("%b %d"));
    let mut output = format!("{}\n", ui::style_text(&title, ui::StyleType::Title));
    let mut rows = week.buyers.clone();
    rows.extend(week.sellers.iter().cloned());
    if rows.is_empty() {
        output.push_str(&ui::style_text("No net buyers or sellers.", ui::StyleType::Subtle));
    } else {
        output.push_str(&ranking_table(&rows));
    }
    output
}

pub fn report(dashboard: &Dashboard, top_n: usize) -> String {
    let rows = dashboard
        .period
        .current
        .as_ref()
        .map(|current| dashboard.trades_in(current))
        .unwrap_or_default();
    let weeks = recent_weeks(&rows, WEEKS_SHOWN, top_n);

    let body = if weeks.is_empty() {
        no_data_message()
    } else {
        let separator = format!("\n{}\n", ui::separator());
        let sections: Vec<String> = weeks.iter().map(render).collect();
        sections.join(separator.as_str())
    };
    format!("{}\n\n{body}", dashboard.heading("Weekly Trading Activity"))
}

pub fn run(dashboard: &Dashboard, top_n: usize) -> Result<()> {
    println!("{}", report(dashboard, top_n));
    Ok(())
}
