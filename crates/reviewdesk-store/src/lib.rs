//! Storage layer: where review documents are fetched from.
//!
//! Backends implement [`DocumentStore`]. The file store evaluates the date
//! query in process; the Data API store (feature `http`) ships the filter to
//! the server.

use async_trait::async_trait;
use reviewdesk_core::{DateQuery, ReviewDocument};

mod error;
pub use error::StoreError;

mod file;
pub use file::FileStore;

#[cfg(feature = "http")]
mod data_api;
#[cfg(feature = "http")]
pub use data_api::{DataApiConfig, DataApiStore};

/// A read-only source of review documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents whose `created_at` falls on the query's day, in store order.
    async fn find(&self, query: &DateQuery) -> Result<Vec<ReviewDocument>, StoreError>;
}
