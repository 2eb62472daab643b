//! Cross-collection search

use std::sync::Arc;

use serde::Deserialize;

use crate::content::{Document, Photo, Reward};
use crate::error::Result;
use crate::fetch::ApiRequest;
use crate::gateway::ApiClient;

/// Matches grouped by collection
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.photos.len() + self.rewards.len() + self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub struct SearchApi {
    api: Arc<ApiClient>,
}

impl SearchApi {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Search every collection. `category` narrows to one collection
    /// (`photos`, `rewards`, `documents`); `None` or `"all"` searches all.
    pub async fn search(&self, query: &str, category: Option<&str>) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let category = category.filter(|c| !c.is_empty() && *c != "all");
        let request = ApiRequest::get("/search/")
            .query("q", query)
            .query_opt("category", category);
        self.api.send_json(request).await
    }
}
