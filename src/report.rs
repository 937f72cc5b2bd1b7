//! Console summary of a run, printed when running verbosely.

use crate::run::RunSummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};

pub fn render(summary: &RunSummary, threshold: i64) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Certificate", "Status", "Detail"]);

    for entry in &summary.expiring {
        table.add_row(vec![
            Cell::new(&entry.identifier),
            Cell::new("EXPIRING").fg(Color::Yellow),
            Cell::new(format!("{} days left", entry.days_remaining)),
        ]);
    }
    for entry in &summary.errored {
        table.add_row(vec![
            Cell::new(&entry.identifier),
            Cell::new("ERROR").fg(Color::Red),
            Cell::new(&entry.cause),
        ]);
    }

    format!(
        "{}\nChecked {} certificate(s): {} expiring within {} days, {} errored, {} healthy",
        table,
        summary.total(),
        summary.expiring.len(),
        threshold,
        summary.errored.len(),
        summary.healthy
    )
}
