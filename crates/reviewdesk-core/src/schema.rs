//! Arrow schema for finding tables.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::finding::{Column, ColumnSet, FindingTable};

/// All-`Utf8`, non-nullable schema for a column set. Cells are display strings.
pub fn findings_schema(set: ColumnSet) -> Schema {
    schema_for(set.columns())
}

fn schema_for(columns: &[Column]) -> Schema {
    Schema::new(
        columns
            .iter()
            .map(|c| Field::new(c.name(), DataType::Utf8, false))
            .collect::<Vec<_>>(),
    )
}

/// Convert a finding table into a single RecordBatch, one column per table column.
pub fn to_record_batch(table: &FindingTable) -> Result<RecordBatch, ArrowError> {
    let arrays: Vec<ArrayRef> = (0..table.columns().len())
        .map(|i| {
            let values = table.rows().iter().map(|row| row[i].as_str());
            Arc::new(StringArray::from_iter_values(values)) as ArrayRef
        })
        .collect();
    RecordBatch::try_new(Arc::new(schema_for(table.columns())), arrays)
}
