pub mod document;
pub mod export;
pub mod finding;
pub mod locator;
pub mod query;
pub mod schema;
pub mod session;

pub use document::{Artifact, CreatedAt, DocumentError, ReviewDocument, Section};
pub use export::{ExportError, export_file_name, to_csv_string, write_csv};
pub use finding::{Column, ColumnSet, Extractor, Finding, FindingTable, extract};
pub use locator::{BlobLocator, LocatorError};
pub use query::DateQuery;
pub use schema::{findings_schema, to_record_batch};
pub use session::SessionStore;
