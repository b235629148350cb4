pub mod csv_export;
pub mod table;

use crate::classify::{GroupReport, GroupSource};
use colored::Colorize;

pub use csv_export::write_csv;
pub use table::{print_table, render_table};

/// Row counts per source, in `GroupSource::ALL` order
pub fn summarize(records: &[GroupReport]) -> Vec<(GroupSource, usize)> {
    GroupSource::ALL
        .iter()
        .map(|source| {
            let count = records.iter().filter(|r| r.source == *source).count();
            (*source, count)
        })
        .collect()
}

pub fn print_summary(records: &[GroupReport]) {
    if records.is_empty() {
        return;
    }

    let parts: Vec<String> = summarize(records)
        .into_iter()
        .map(|(source, count)| {
            let label = format!("{}: {}", source, count);
            match source {
                GroupSource::Cloud => label.cyan().to_string(),
                GroupSource::OnPrem => label.yellow().to_string(),
                GroupSource::NotFound => label.dimmed().to_string(),
                GroupSource::Error if count > 0 => label.red().bold().to_string(),
                GroupSource::Error => label,
            }
        })
        .collect();

    println!(
        "\n{} {} groups ({})",
        "→".cyan(),
        records.len(),
        parts.join(", ")
    );
}
