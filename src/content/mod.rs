//! Photos, rewards and documents
//!
//! The three content kinds share one shape of endpoint (list, detail,
//! upload, delete, like toggle), so one generic sub-client serves them all.

mod types;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::fetch::{ApiRequest, MultipartForm};
use crate::gateway::ApiClient;

pub use types::*;

/// A kind of content served under its own collection path
pub trait ContentKind: DeserializeOwned + Send + 'static {
    /// Collection path, with leading and trailing slash
    const PATH: &'static str;

    /// Form used to create an item
    type Upload: Into<MultipartForm>;
}

impl ContentKind for Photo {
    const PATH: &'static str = "/photos/";
    type Upload = PhotoUpload;
}

impl ContentKind for Reward {
    const PATH: &'static str = "/rewards/";
    type Upload = RewardUpload;
}

impl ContentKind for Document {
    const PATH: &'static str = "/documents/";
    type Upload = DocumentUpload;
}

/// Client for one content collection
pub struct ContentApi<T> {
    api: Arc<ApiClient>,
    kind: PhantomData<fn() -> T>,
}

pub type PhotosApi = ContentApi<Photo>;
pub type RewardsApi = ContentApi<Reward>;
pub type DocumentsApi = ContentApi<Document>;

impl<T: ContentKind> ContentApi<T> {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            kind: PhantomData,
        }
    }

    fn item_path(id: u64) -> String {
        format!("{}{}/", T::PATH, id)
    }

    /// List the collection
    pub async fn list(&self, params: &ListParams) -> Result<Vec<T>> {
        let request = ApiRequest::get(T::PATH)
            .query_opt("uploaded_by", params.uploaded_by)
            .query_opt("awarded_by", params.awarded_by)
            .query_opt("category", params.category)
            .query_opt("ordering", params.ordering.as_deref())
            .query_opt("limit", params.limit);
        self.api.send_listing(request).await
    }

    /// Fetch one item
    pub async fn get(&self, id: u64) -> Result<T> {
        self.api.send_json(ApiRequest::get(Self::item_path(id))).await
    }

    /// Create an item; needs a representative (or staff) account
    pub async fn upload(&self, upload: T::Upload) -> Result<T> {
        let request = ApiRequest::post(T::PATH).multipart(upload.into());
        self.api.send_json(request).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api
            .send_empty(ApiRequest::delete(Self::item_path(id)))
            .await
    }

    /// Like the item, or unlike it if already liked
    pub async fn toggle_like(&self, id: u64) -> Result<LikeState> {
        let request = ApiRequest::post(format!("{}like/", Self::item_path(id)));
        let state = self.api.send_optional_json::<LikeState>(request).await?;
        Ok(state.unwrap_or_default())
    }
}

impl ContentApi<Photo> {
    /// Photos the backend marks as featured
    pub async fn featured(&self) -> Result<Vec<Photo>> {
        self.api
            .send_listing(ApiRequest::get("/photos/featured/"))
            .await
    }
}

/// Client for photo categories
pub struct CategoriesApi {
    api: Arc<ApiClient>,
}

impl CategoriesApi {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.api.send_listing(ApiRequest::get("/categories/")).await
    }

    /// Categories belonging to `batch`, the ones a representative may upload to
    pub async fn for_batch(&self, batch: &str) -> Result<Vec<Category>> {
        let categories = self.list().await?;
        Ok(categories
            .into_iter()
            .filter(|c| c.batch.as_deref() == Some(batch))
            .collect())
    }
}
