//! Types for photos, rewards, documents and their listings

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::fetch::{FileUpload, MultipartForm};

/// Parse a backend timestamp. RFC 3339 first, then a naive date-time or
/// date read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `created_at` as the backend sends it; anything unparsable becomes `None`
pub fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// Collection answer: the backend paginates some endpoints and not others
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

/// A paginated collection answer
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.results,
            Listing::Items(items) => items,
        }
    }
}

/// Answer to a like toggle
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LikeState {
    #[serde(default, alias = "is_liked")]
    pub liked: Option<bool>,
    #[serde(default)]
    pub total_likes: Option<u64>,
}

/// Photo category, scoped to a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A photo's category: a bare id, or the full record when the backend expands it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(u64),
    Expanded(Category),
}

impl CategoryRef {
    pub fn id(&self) -> u64 {
        match self {
            CategoryRef::Id(id) => *id,
            CategoryRef::Expanded(category) => category.id,
        }
    }

    pub fn batch(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Expanded(category) => category.batch.as_deref(),
        }
    }
}

/// A campus photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub photo_type: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub total_likes: Option<u64>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub uploaded_by: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A student achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: u64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub achievement: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub student_batch: Option<String>,
    #[serde(default)]
    pub student_department: Option<String>,
    #[serde(default)]
    pub total_likes: Option<u64>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub awarded_by: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A shared document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub total_likes: Option<u64>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub uploaded_by: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query knobs accepted by the listing endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub uploaded_by: Option<u64>,
    pub awarded_by: Option<u64>,
    /// e.g. `-created_at`
    pub ordering: Option<String>,
    pub limit: Option<u32>,
    pub category: Option<u64>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first, at most `limit` items
    pub fn latest(limit: u32) -> Self {
        Self::new().ordering("-created_at").limit(limit)
    }

    pub fn uploaded_by(mut self, user_id: u64) -> Self {
        self.uploaded_by = Some(user_id);
        self
    }

    pub fn awarded_by(mut self, user_id: u64) -> Self {
        self.awarded_by = Some(user_id);
        self
    }

    pub fn ordering(mut self, ordering: &str) -> Self {
        self.ordering = Some(ordering.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn category(mut self, category: u64) -> Self {
        self.category = Some(category);
        self
    }
}

/// New photo
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub title: String,
    pub description: String,
    pub category: Option<u64>,
    /// e.g. `general`, `celebration`
    pub photo_type: String,
    pub image: FileUpload,
}

impl PhotoUpload {
    pub fn new(title: impl Into<String>, image: FileUpload) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: None,
            photo_type: "general".to_string(),
            image,
        }
    }
}

impl From<PhotoUpload> for MultipartForm {
    fn from(upload: PhotoUpload) -> Self {
        MultipartForm::new()
            .text("title", upload.title)
            .text("description", upload.description)
            .text_opt("category", upload.category.map(|id| id.to_string()))
            .text("photo_type", upload.photo_type)
            .file("image", upload.image)
    }
}

/// New reward
#[derive(Debug, Clone)]
pub struct RewardUpload {
    pub student_name: String,
    pub student_department: String,
    pub student_batch: String,
    pub achievement: String,
    pub image: Option<FileUpload>,
}

impl From<RewardUpload> for MultipartForm {
    fn from(upload: RewardUpload) -> Self {
        let form = MultipartForm::new()
            .text("student_name", upload.student_name)
            .text("student_department", upload.student_department)
            .text("student_batch", upload.student_batch)
            .text("achievement", upload.achievement);
        match upload.image {
            Some(image) => form.file("image", image),
            None => form,
        }
    }
}

/// New document
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub title: String,
    pub description: String,
    pub document_type: String,
    pub file: FileUpload,
}

impl From<DocumentUpload> for MultipartForm {
    fn from(upload: DocumentUpload) -> Self {
        MultipartForm::new()
            .text("title", upload.title)
            .text("description", upload.description)
            .text("document_type", upload.document_type)
            .file("file", upload.file)
    }
}
