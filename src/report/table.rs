use crate::classify::GroupReport;

pub const EMPTY_NOTICE: &str = "No records to display.";

const COLUMN_GAP: &str = "  ";

type Column = (&'static str, fn(&GroupReport) -> &str);

const COLUMNS: [Column; 6] = [
    ("Requested", |r| r.requested_name.as_str()),
    ("Graph Match", |r| r.matched_name.as_str()),
    ("Source", |r| r.source.as_str()),
    ("On-Prem Domain", |r| r.domain.as_str()),
    ("Reason", |r| r.reason.as_str()),
    ("Object Id", |r| r.group_id.as_str()),
];

fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Render records as a fixed-width table: header, dash separator, one line per record
pub fn render_table(records: &[GroupReport]) -> String {
    if records.is_empty() {
        return EMPTY_NOTICE.to_string();
    }

    let widths: Vec<usize> = COLUMNS
        .iter()
        .map(|(header, cell)| {
            records
                .iter()
                .map(|r| width_of(cell(r)))
                .fold(width_of(header), usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(records.len() + 2);

    lines.push(
        COLUMNS
            .iter()
            .zip(&widths)
            .map(|((header, _), w)| pad(header, *w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );

    for record in records {
        lines.push(
            COLUMNS
                .iter()
                .zip(&widths)
                .map(|((_, cell), w)| pad(cell(record), *w))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP),
        );
    }

    lines.join("\n")
}

pub fn print_table(records: &[GroupReport]) {
    println!("{}", render_table(records));
}
