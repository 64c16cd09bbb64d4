//! CSV export of finding tables.

use std::io::Write;

use thiserror::Error;

use crate::finding::FindingTable;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download name for a record's findings.
pub fn export_file_name(record_id: &str) -> String {
    format!("compliance_{record_id}.csv")
}

/// Write a header row plus one row per finding. Lines end in `\n`.
pub fn write_csv<W: Write>(table: &FindingTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(table.column_names())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &FindingTable) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
