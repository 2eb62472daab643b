//! Comments on photos, rewards and documents

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{CommentContentTypes, ContentTypeRef};
use crate::content::lenient_timestamp;
use crate::error::{Error, Result};
use crate::fetch::ApiRequest;
use crate::gateway::ApiClient;

/// What a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Photo,
    Reward,
    Document,
}

impl CommentTarget {
    /// Label the comment filter endpoint expects
    pub fn label(&self) -> &'static str {
        match self {
            CommentTarget::Photo => "photo",
            CommentTarget::Reward => "reward",
            CommentTarget::Document => "document",
        }
    }
}

/// A comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<serde_json::Value>,
    #[serde(default)]
    pub object_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct NewComment<'a> {
    content: &'a str,
    content_type: &'a ContentTypeRef,
    object_id: u64,
}

/// Client for comments
pub struct CommentsApi {
    api: Arc<ApiClient>,
    content_types: CommentContentTypes,
}

impl CommentsApi {
    pub(crate) fn new(api: Arc<ApiClient>, content_types: CommentContentTypes) -> Self {
        Self { api, content_types }
    }

    fn content_type(&self, target: CommentTarget) -> &ContentTypeRef {
        match target {
            CommentTarget::Photo => &self.content_types.photo,
            CommentTarget::Reward => &self.content_types.reward,
            CommentTarget::Document => &self.content_types.document,
        }
    }

    /// Comments attached to one item
    pub async fn list_for(&self, target: CommentTarget, object_id: u64) -> Result<Vec<Comment>> {
        let request = ApiRequest::get("/comments/")
            .query("content_type", target.label())
            .query("object_id", object_id);
        self.api.send_listing(request).await
    }

    /// Post a comment; blank content is rejected without a request
    pub async fn post(
        &self,
        target: CommentTarget,
        object_id: u64,
        content: &str,
    ) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation(
                [("content", "Comment cannot be empty")].into_iter().collect(),
            ));
        }

        let body = NewComment {
            content,
            content_type: self.content_type(target),
            object_id,
        };
        let request = ApiRequest::post("/comments/").json(&body)?;
        self.api.send_json(request).await
    }
}
