//! File-backed document store: a JSON array or JSON Lines export of the collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reviewdesk_core::{DateQuery, ReviewDocument};
use serde_json::Value;
use tracing::{debug, info};

use crate::{DocumentStore, StoreError};

/// Review documents loaded once from a local export.
///
/// Accepts either a single JSON array or one JSON document per line, in
/// Mongo extended JSON as produced by `mongoexport`. File order is store order.
pub struct FileStore {
    path: PathBuf,
    documents: Vec<ReviewDocument>,
}

impl FileStore {
    /// Read and parse the whole file. Fails on the first malformed document.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let contents = tokio::fs::read_to_string(path).await?;
        let documents = parse_documents(&contents, &path.display().to_string())?;
        info!(path = %path.display(), count = documents.len(), "loaded review documents");
        Ok(Self {
            path: path.to_path_buf(),
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn find(&self, query: &DateQuery) -> Result<Vec<ReviewDocument>, StoreError> {
        let found: Vec<ReviewDocument> = self
            .documents
            .iter()
            .filter(|d| query.matches(d))
            .cloned()
            .collect();
        debug!(
            path = %self.path.display(),
            day = %query.day(),
            count = found.len(),
            "file store query"
        );
        Ok(found)
    }
}

fn parse_documents(contents: &str, source_name: &str) -> Result<Vec<ReviewDocument>, StoreError> {
    let values: Vec<Value> = if contents.trim_start().starts_with('[') {
        serde_json::from_str(contents)?
    } else {
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            ReviewDocument::from_value(value).map_err(|e| StoreError::BadDocument {
                source_name: source_name.to_string(),
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn day(s: &str) -> DateQuery {
        s.parse().unwrap()
    }

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const LINES: &str = r#"
{"_id": {"$oid": "aaa"}, "created_at": {"$date": "2024-03-05T08:00:00Z"}, "recommendations": {}}
{"_id": {"$oid": "bbb"}, "created_at": "2024-03-05 17:45:00"}

{"_id": {"$oid": "ccc"}, "created_at": "2024-03-06 09:00:00"}
{"_id": {"$oid": "ddd"}}
"#;

    #[tokio::test]
    async fn missing_file_errors() {
        let result = FileStore::open(Path::new("/nonexistent/reviews.json")).await;
        assert!(matches!(result, Err(StoreError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn json_lines_filtered_by_day() {
        let file = write_file(LINES);
        let store = FileStore::open(file.path()).await.unwrap();
        assert_eq!(store.len(), 4);

        let found = store.find(&day("2024-03-05")).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["aaa", "bbb"]);

        let found = store.find(&day("2023-01-01")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn json_array_accepted() {
        let file = write_file(r#"[{"_id": "x1", "created_at": "2024-03-06"}, {"_id": "x2"}]"#);
        let store = FileStore::open(file.path()).await.unwrap();
        let found = store.find(&day("2024-03-06")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "x1");
    }

    #[tokio::test]
    async fn document_without_id_is_reported() {
        let file = write_file("{\"_id\": \"ok\"}\n{\"created_at\": \"2024-03-05\"}\n");
        let err = FileStore::open(file.path()).await.err().unwrap();
        match err {
            StoreError::BadDocument { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let file = write_file("{\"_id\": \"ok\"\n");
        assert!(matches!(
            FileStore::open(file.path()).await,
            Err(StoreError::Json(_))
        ));
    }
}
