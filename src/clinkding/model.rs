//! Wire-format records exchanged with the linkding REST API.
//!
//! These mirror the service's JSON exactly and are never persisted. Timestamps are
//! RFC 3339 and parsed into `DateTime<Utc>`. String fields the service may send as
//! `null` are read as empty strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Paginated list envelope used by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub id: u64,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website_description: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub shared: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub date_modified: DateTime<Utc>,
}

impl Bookmark {
    /// The user-set title, falling back to the scraped website title.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.website_title
        } else {
            &self.title
        }
    }
}

/// Body of `POST /api/bookmarks/`. Empty and false fields are left out.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BookmarkCreate {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_names: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_archived: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub unread: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub shared: bool,
}

/// Body of `PATCH /api/bookmarks/{id}/`. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BookmarkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}

impl BookmarkUpdate {
    pub fn is_empty(&self) -> bool {
        *self == BookmarkUpdate::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookmarkMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Result of `GET /api/bookmarks/check/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookmarkCheck {
    #[serde(default)]
    pub bookmark: Option<Bookmark>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BookmarkMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub bookmark_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagCreate {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BundleCreate {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BundleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BundleUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// A file attached to a bookmark. The content itself is only ever streamed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: u64,
    #[serde(rename = "bookmark", default)]
    pub bookmark_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchPreferences {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unread: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub theme: String,
    pub bookmark_date_display: String,
    pub bookmark_link_target: String,
    pub web_archive_integration: String,
    pub enable_sharing: bool,
    pub enable_public_sharing: bool,
    pub enable_favicons: bool,
    pub enable_preview_images: bool,
    pub display_url: bool,
    pub display_viewed_date: bool,
    pub permanent_notes: bool,
    pub search_preferences: SearchPreferences,
}
