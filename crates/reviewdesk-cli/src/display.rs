//! Terminal rendering for review records and their findings.

use arrow::util::pretty::pretty_format_batches;
use reviewdesk_core::{FindingTable, ReviewDocument, SessionStore, to_record_batch};

const ID_WIDTH: usize = 26;

/// One line per cached record, in fetch order.
pub fn print_record_list(session: &SessionStore) {
    println!("{} record(s)", session.len());
    for (i, id) in session.ids().iter().enumerate() {
        let Some(doc) = session.get(id) else {
            continue;
        };
        println!("  {:>3}  {}", i + 1, record_line(doc));
    }
}

fn record_line(doc: &ReviewDocument) -> String {
    let created = doc
        .created_at
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let pdf = if doc.gcs_uri.is_some() { "pdf" } else { "" };
    format!(
        "{:<ID_WIDTH$} {:<20} {:>4} sections  {}",
        doc.id,
        created,
        doc.section_count(),
        pdf
    )
    .trim_end()
    .to_string()
}

/// Heading shown above a record's findings.
pub fn print_record_header(doc: &ReviewDocument) {
    println!("=== {} ===", doc.id);
    if let Some(created) = &doc.created_at {
        println!("  {:<12} {}", "created_at", created);
    }
    let artifacts: Vec<&str> = doc.recommendations.iter().map(|(n, _)| n.as_str()).collect();
    if !artifacts.is_empty() {
        println!("  {:<12} {}", "artifacts", artifacts.join(", "));
    }
    if let Some(uri) = &doc.gcs_uri {
        println!("  {:<12} {}", "source", uri);
    }
    println!();
}

/// Render findings as a bordered table.
pub fn format_findings(table: &FindingTable) -> anyhow::Result<String> {
    let batch = to_record_batch(table)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

pub fn print_findings(table: &FindingTable) -> anyhow::Result<()> {
    println!("Compliance Findings ({})", table.len());
    println!("{}", format_findings(table)?);
    Ok(())
}
