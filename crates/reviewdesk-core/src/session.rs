//! Session-scoped cache of the most recently fetched review documents.

use std::collections::HashMap;

use crate::document::ReviewDocument;

/// Maps display-stable record ids to the documents from the latest fetch.
///
/// Owned by one operator session. The only mutation is [`replace_all`](Self::replace_all),
/// which discards everything previously cached.
#[derive(Debug, Default)]
pub struct SessionStore {
    order: Vec<String>,
    documents: HashMap<String, ReviewDocument>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mapping with `documents`, keyed by id.
    ///
    /// Fetch order is kept for [`ids`](Self::ids). If two documents share an id
    /// the later one wins and the id keeps its first position.
    pub fn replace_all(&mut self, documents: Vec<ReviewDocument>) {
        let mut order = Vec::with_capacity(documents.len());
        let mut map = HashMap::with_capacity(documents.len());
        for doc in documents {
            if !map.contains_key(&doc.id) {
                order.push(doc.id.clone());
            }
            map.insert(doc.id.clone(), doc);
        }
        self.order = order;
        self.documents = map;
    }

    pub fn get(&self, id: &str) -> Option<&ReviewDocument> {
        self.documents.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Cached ids in fetch order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }
}
