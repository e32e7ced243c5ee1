//! Text rendering for the admin views.

use crate::record::RsvpRecord;
use crate::storage::schema::format_timestamp;
use crate::storage::RsvpSummary;

const TABLE_HEADERS: [&str; 6] = ["Timestamp", "Name", "Email", "Guests", "Attending", "Message"];

/// Render responses as one block per response.
#[must_use]
pub fn render_plain(records: &[RsvpRecord]) -> String {
    if records.is_empty() {
        return "No RSVPs yet.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{}  {} <{}>\n",
            format_timestamp(&record.timestamp),
            record.name,
            record.email
        ));
        out.push_str(&format!(
            "  {} ({} {})\n",
            record.attendance.label(),
            record.guest_count,
            if record.guest_count == 1 { "guest" } else { "guests" }
        ));
        for line in record.message.lines() {
            out.push_str(&format!("  > {line}\n"));
        }
        out.push('\n');
    }
    out
}

/// Render responses as an aligned table.
///
/// Line breaks inside messages are flattened to spaces so each response
/// stays on one row.
#[must_use]
pub fn render_table(records: &[RsvpRecord]) -> String {
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                format_timestamp(&r.timestamp),
                r.name.clone(),
                r.email.clone(),
                r.guest_count.to_string(),
                if r.attendance.is_attending() { "yes" } else { "no" }.to_string(),
                r.message.split_whitespace().collect::<Vec<_>>().join(" "),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![table_line(&TABLE_HEADERS.map(str::to_string), &widths), rule.join("  ")];
    lines.extend(rows.iter().map(|row| table_line(row, &widths)));
    lines.push(format!("{} response(s)", rows.len()));
    lines.join("\n") + "\n"
}

fn table_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Render the headcount summary.
#[must_use]
pub fn render_summary(summary: &RsvpSummary) -> String {
    let mut lines = vec![
        "RSVP summary".to_string(),
        "------------".to_string(),
        format!("Responses:        {}", summary.total_responses),
        format!("Attending:        {}", summary.attending_responses),
        format!("Declined:         {}", summary.declined_responses),
        format!("Expected guests:  {}", summary.expected_guests),
    ];
    if let Some(first) = summary.first_response {
        lines.push(format!("First response:   {}", format_timestamp(&first)));
    }
    if let Some(latest) = summary.latest_response {
        lines.push(format!("Latest response:  {}", format_timestamp(&latest)));
    }
    lines.join("\n") + "\n"
}
