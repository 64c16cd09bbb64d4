//! Operator-facing messages for each dashboard action.
//!
//! Empty results are informational, never errors.

use std::path::Path;
use std::time::Duration;

use reviewdesk_core::{ColumnSet, DateQuery};

#[cfg(feature = "pdf-download")]
use crate::dashboard::PdfLink;
use crate::dashboard::{Dashboard, FetchOutcome, FindingsView};
use crate::display;

pub async fn fetch(dashboard: &mut Dashboard, date: DateQuery) -> anyhow::Result<FetchOutcome> {
    let outcome = dashboard.fetch(date).await?;
    match outcome {
        FetchOutcome::Empty => {
            println!("No records for {}. Pick another date and fetch again.", date.day())
        }
        FetchOutcome::Loaded(_) => display::print_record_list(dashboard.session()),
    }
    Ok(outcome)
}

pub fn records(dashboard: &Dashboard) {
    if dashboard.session().is_empty() {
        println!("No records loaded. Select a date and fetch records.");
    } else {
        display::print_record_list(dashboard.session());
    }
}

pub fn findings(dashboard: &Dashboard, columns: ColumnSet) -> anyhow::Result<()> {
    match dashboard.findings(columns) {
        FindingsView::NoRecords => println!("No records loaded. Select a date and fetch records."),
        FindingsView::NoSections => println!("No compliance sections found"),
        FindingsView::Table(table) => {
            if let Some(doc) = dashboard.selected_document() {
                display::print_record_header(doc);
            }
            display::print_findings(&table)?;
        }
    }
    Ok(())
}

pub fn export(dashboard: &Dashboard, dir: &Path, columns: ColumnSet) -> anyhow::Result<()> {
    match dashboard.export_csv(dir, columns)? {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("Nothing to export: no compliance sections found"),
    }
    Ok(())
}

#[cfg(feature = "pdf-download")]
pub fn pdf_link(dashboard: &Dashboard, expires: Duration) {
    match dashboard.pdf_link(expires) {
        PdfLink::NoRecord => println!("No record selected."),
        PdfLink::NoLocator => println!("warning: GCS URI not available for this record"),
        PdfLink::Issued(url) => {
            println!("Download PDF (valid {} min):", expires.as_secs() / 60);
            println!("{url}");
        }
        PdfLink::Failed(msg) => eprintln!("Failed to generate PDF download link: {msg}"),
    }
}

#[cfg(not(feature = "pdf-download"))]
pub fn pdf_link(_dashboard: &Dashboard, _expires: Duration) {
    println!("PDF download is not available in this build (enable the `pdf-download` feature).");
}
