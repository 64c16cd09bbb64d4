//! HTTP client for a document-store Data API (`/action/find`).

use async_trait::async_trait;
use reviewdesk_core::{DateQuery, ReviewDocument};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{DocumentStore, StoreError};

/// Where the review collection lives.
#[derive(Debug, Clone)]
pub struct DataApiConfig {
    /// Like `https://data.example.com/app/reviews/endpoint/data/v1` (no trailing slash needed).
    pub base_url: String,
    pub api_key: String,
    pub data_source: String,
    pub database: String,
    pub collection: String,
}

/// Queries review documents through the Data API.
pub struct DataApiStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
    collection: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    data_source: &'a str,
    database: &'a str,
    collection: &'a str,
    filter: Value,
}

#[derive(Deserialize)]
struct FindResponse {
    documents: Vec<ReviewDocument>,
}

impl DataApiStore {
    pub fn new(config: DataApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            data_source: config.data_source,
            database: config.database,
            collection: config.collection,
        }
    }

    fn find_request(&self, query: &DateQuery) -> FindRequest<'_> {
        FindRequest {
            data_source: &self.data_source,
            database: &self.database,
            collection: &self.collection,
            filter: query.to_filter(),
        }
    }
}

#[async_trait]
impl DocumentStore for DataApiStore {
    async fn find(&self, query: &DateQuery) -> Result<Vec<ReviewDocument>, StoreError> {
        let url = format!("{}/action/find", self.base_url);

        info!(url = %url, day = %query.day(), collection = %self.collection, "querying review documents");
        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/ejson")
            .json(&self.find_request(query))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let result: FindResponse = serde_json::from_str(&body)?;
        info!(count = result.documents.len(), "fetched review documents");
        Ok(result.documents)
    }
}
