use crate::classify::GroupReport;
use crate::error::Result;
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Column order of the CSV report
pub const CSV_HEADERS: [&str; 6] = [
    "requested_name",
    "matched_name",
    "source",
    "reason",
    "group_id",
    "domain",
];

/// Write the report to `path`, creating missing parent directories
pub fn write_csv(path: &Path, records: &[GroupReport]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record([
            record.requested_name.as_str(),
            record.matched_name.as_str(),
            record.source.as_str(),
            record.reason.as_str(),
            record.group_id.as_str(),
            record.domain.as_str(),
        ])?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to {}", records.len(), path.display());
    println!(
        "{} Saved CSV results to '{}'.",
        "✓".green(),
        path.display()
    );

    Ok(())
}
