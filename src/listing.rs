//! Filtering and sorting of fetched listings
//!
//! Listing pages fetch a whole collection once and narrow it down locally.
//! All sorts are stable; items without a `created_at` sort last.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Months, Utc};

use crate::content::{Document, Photo, Reward};
use crate::search::SearchResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Latest,
    Oldest,
    /// Most liked first
    Popular,
    /// Featured first, otherwise unchanged
    Featured,
}

/// Age limit applied to search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Oldest timestamp still inside the range
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Day => now - Duration::days(1),
            TimeRange::Week => now - Duration::days(7),
            TimeRange::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            TimeRange::Year => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        }
    }
}

/// Case-insensitive "any of these fields contains the term"; an empty term matches everything
fn matches_text(term: &str, fields: &[Option<&str>]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn oldest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn most_liked_first(a: Option<u64>, b: Option<u64>) -> Ordering {
    b.unwrap_or(0).cmp(&a.unwrap_or(0))
}

/// Something a listing can be sorted by
pub trait Sortable {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn total_likes(&self) -> Option<u64>;
    fn is_featured(&self) -> bool {
        false
    }
}

impl Sortable for Photo {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn total_likes(&self) -> Option<u64> {
        self.total_likes
    }
    fn is_featured(&self) -> bool {
        self.is_featured
    }
}

impl Sortable for Reward {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn total_likes(&self) -> Option<u64> {
        self.total_likes
    }
}

impl Sortable for Document {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn total_likes(&self) -> Option<u64> {
        self.total_likes
    }
}

pub fn sort_items<T: Sortable>(items: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Latest => items.sort_by(|a, b| newest_first(a.created_at(), b.created_at())),
        SortOrder::Oldest => items.sort_by(|a, b| oldest_first(a.created_at(), b.created_at())),
        SortOrder::Popular => {
            items.sort_by(|a, b| most_liked_first(a.total_likes(), b.total_likes()))
        }
        SortOrder::Featured => items.sort_by_key(|item| !item.is_featured()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhotoFilter {
    pub search: String,
    pub category: Option<u64>,
    pub photo_type: Option<String>,
    pub sort: SortOrder,
}

impl PhotoFilter {
    pub fn matches(&self, photo: &Photo) -> bool {
        let category_ok = self.category.map_or(true, |wanted| {
            photo.category.as_ref().map(|c| c.id()) == Some(wanted)
        });
        let type_ok = self
            .photo_type
            .as_deref()
            .map_or(true, |wanted| photo.photo_type.as_deref() == Some(wanted));
        category_ok
            && type_ok
            && matches_text(
                &self.search,
                &[photo.title.as_deref(), photo.description.as_deref()],
            )
    }

    pub fn apply(&self, photos: &[Photo]) -> Vec<Photo> {
        let mut result: Vec<Photo> = photos.iter().filter(|p| self.matches(p)).cloned().collect();
        sort_items(&mut result, self.sort);
        result
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub search: String,
    pub document_type: Option<String>,
    pub sort: SortOrder,
}

impl DocumentFilter {
    pub fn matches(&self, document: &Document) -> bool {
        let type_ok = self
            .document_type
            .as_deref()
            .map_or(true, |wanted| document.document_type.as_deref() == Some(wanted));
        type_ok
            && matches_text(
                &self.search,
                &[document.title.as_deref(), document.description.as_deref()],
            )
    }

    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        let mut result: Vec<Document> = documents
            .iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect();
        sort_items(&mut result, self.sort);
        result
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewardFilter {
    pub search: String,
    pub batch: Option<String>,
    pub department: Option<String>,
    pub sort: SortOrder,
}

impl RewardFilter {
    pub fn matches(&self, reward: &Reward) -> bool {
        let batch_ok = self
            .batch
            .as_deref()
            .map_or(true, |wanted| reward.student_batch.as_deref() == Some(wanted));
        let department_ok = self
            .department
            .as_deref()
            .map_or(true, |wanted| reward.student_department.as_deref() == Some(wanted));
        batch_ok
            && department_ok
            && matches_text(
                &self.search,
                &[reward.student_name.as_deref(), reward.achievement.as_deref()],
            )
    }

    pub fn apply(&self, rewards: &[Reward]) -> Vec<Reward> {
        let mut result: Vec<Reward> = rewards.iter().filter(|r| self.matches(r)).cloned().collect();
        sort_items(&mut result, self.sort);
        result
    }
}

/// Batches present among `rewards`, for populating a filter dropdown
pub fn distinct_batches(rewards: &[Reward]) -> Vec<String> {
    distinct(rewards.iter().map(|r| r.student_batch.as_deref()))
}

/// Departments present among `rewards`
pub fn distinct_departments(rewards: &[Reward]) -> Vec<String> {
    distinct(rewards.iter().map(|r| r.student_department.as_deref()))
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Narrowing applied to search results
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Photos by category batch, rewards by student batch
    pub batch: Option<String>,
    pub document_type: Option<String>,
    pub time_range: Option<TimeRange>,
}

impl SearchFilter {
    pub fn apply(&self, results: &SearchResults, now: DateTime<Utc>) -> SearchResults {
        let cutoff = self.time_range.map(|range| range.cutoff(now));
        let recent = |created_at: Option<DateTime<Utc>>| match cutoff {
            Some(cutoff) => created_at.map_or(false, |at| at >= cutoff),
            None => true,
        };

        let batch = self.batch.as_deref();
        let document_type = self.document_type.as_deref();

        SearchResults {
            photos: results
                .photos
                .iter()
                .filter(|p| {
                    batch.map_or(true, |b| p.category.as_ref().and_then(|c| c.batch()) == Some(b))
                })
                .filter(|p| recent(p.created_at))
                .cloned()
                .collect(),
            rewards: results
                .rewards
                .iter()
                .filter(|r| batch.map_or(true, |b| r.student_batch.as_deref() == Some(b)))
                .filter(|r| recent(r.created_at))
                .cloned()
                .collect(),
            documents: results
                .documents
                .iter()
                .filter(|d| document_type.map_or(true, |t| d.document_type.as_deref() == Some(t)))
                .filter(|d| recent(d.created_at))
                .cloned()
                .collect(),
        }
    }
}

/// Sort every group of a search result
pub fn sort_search_results(results: &mut SearchResults, order: SortOrder) {
    sort_items(&mut results.photos, order);
    sort_items(&mut results.rewards, order);
    sort_items(&mut results.documents, order);
}
