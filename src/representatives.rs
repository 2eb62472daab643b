//! Requests to become a batch representative

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::lenient_timestamp;
use crate::error::{Error, Result};
use crate::fetch::ApiRequest;
use crate::gateway::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// The requesting user as embedded in a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requester {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeRequest {
    pub id: u64,
    #[serde(default)]
    pub user: Option<Requester>,
    /// Flat copies of the requester's details, when the backend sends them
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_department: Option<String>,
    #[serde(default)]
    pub user_batch: Option<String>,
    #[serde(default)]
    pub request_message: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RepresentativeRequest {
    /// Requester's name: the flat `user_name`, else first and last name of `user`
    pub fn requester_name(&self) -> Option<String> {
        if let Some(name) = present(&self.user_name) {
            return Some(name.to_string());
        }
        let user = self.user.as_ref()?;
        let parts: Vec<&str> = [present(&user.first_name), present(&user.last_name)]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    pub fn requester_department(&self) -> Option<&str> {
        present(&self.user_department)
            .or_else(|| self.user.as_ref().and_then(|u| present(&u.department)))
    }

    pub fn requester_batch(&self) -> Option<&str> {
        present(&self.user_batch).or_else(|| self.user.as_ref().and_then(|u| present(&u.batch)))
    }
}

/// True if `user_id` already has a request waiting for review
pub fn has_pending_for(requests: &[RepresentativeRequest], user_id: u64) -> bool {
    requests.iter().any(|request| {
        request.status == RequestStatus::Pending
            && request.user.as_ref().map(|u| u.id) == Some(user_id)
    })
}

#[derive(Serialize)]
struct NewRequest<'a> {
    request_message: &'a str,
}

/// Client for representative requests.
///
/// Students see their own requests; staff see all of them and may approve
/// or reject.
pub struct RepresentativeRequestsApi {
    api: Arc<ApiClient>,
}

impl RepresentativeRequestsApi {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<RepresentativeRequest>> {
        self.api
            .send_listing(ApiRequest::get("/representative-requests/"))
            .await
    }

    /// Ask to become a representative
    pub async fn submit(&self, message: &str) -> Result<()> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Validation(
                [("request_message", "Please explain why you want to be a representative")]
                    .into_iter()
                    .collect(),
            ));
        }

        let request = ApiRequest::post("/representative-requests/").json(&NewRequest {
            request_message: message,
        })?;
        self.api.send_empty(request).await
    }

    pub async fn approve(&self, id: u64) -> Result<()> {
        let path = format!("/representative-requests/{}/approve/", id);
        self.api.send_empty(ApiRequest::post(path)).await
    }

    pub async fn reject(&self, id: u64) -> Result<()> {
        let path = format!("/representative-requests/{}/reject/", id);
        self.api.send_empty(ApiRequest::post(path)).await
    }
}
