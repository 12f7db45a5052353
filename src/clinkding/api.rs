//! # API Facade
//!
//! [`LinkdingApi`] is the single entry point the CLI uses to talk to a linkding
//! instance. It holds the [`Client`] and dispatches each semantic operation to the
//! matching gateway function.
//!
//! The facade is also the only place that normalizes user input before it reaches the
//! wire:
//! - comma-separated tag lists are split and trimmed ([`parse_tags`])
//! - `--add-tags` / `--remove-tags` are merged against the current bookmark ([`merge_tags`])
//! - date filters accept RFC 3339 or relative durations like `7d` ([`parse_since`])
//!
//! It never prints. Results are returned as model types for the output layer.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::gateway::{self, bookmarks::ListOptions};
use crate::model::{
    Asset, Bookmark, BookmarkCheck, BookmarkCreate, BookmarkUpdate, Bundle, BundleCreate,
    BundleUpdate, Page, Tag, UserProfile,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::path::Path;
use tracing::debug;

/// How an update should treat the bookmark's tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TagChange {
    #[default]
    Keep,
    Replace(Vec<String>),
    Merge { add: Vec<String>, remove: Vec<String> },
}

/// Requested edits to a bookmark; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkChanges {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: TagChange,
    pub shared: Option<bool>,
    pub unread: Option<bool>,
}

impl BookmarkChanges {
    fn into_update(self, tag_names: Option<Vec<String>>) -> BookmarkUpdate {
        BookmarkUpdate {
            url: self.url,
            title: self.title,
            description: self.description,
            notes: self.notes,
            tag_names,
            unread: self.unread,
            shared: self.shared,
        }
    }
}

pub struct LinkdingApi {
    client: Client,
}

impl LinkdingApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn list_bookmarks(&self, opts: &ListOptions) -> Result<Page<Bookmark>> {
        debug!(?opts, "listing bookmarks");
        gateway::bookmarks::list(&self.client, opts)
    }

    pub fn get_bookmark(&self, id: u64) -> Result<Bookmark> {
        gateway::bookmarks::get(&self.client, id)
    }

    pub fn check_url(&self, url: &str) -> Result<BookmarkCheck> {
        gateway::bookmarks::check(&self.client, url)
    }

    pub fn create_bookmark(&self, payload: &BookmarkCreate, disable_scraping: bool) -> Result<Bookmark> {
        if payload.url.trim().is_empty() {
            return Err(Error::Validation("bookmark URL cannot be empty".into()));
        }
        debug!(url = %payload.url, disable_scraping, "creating bookmark");
        gateway::bookmarks::create(&self.client, payload, disable_scraping)
    }

    /// Applies `changes` to bookmark `id`.
    ///
    /// Merging tags needs the current tag list, so that case fetches the bookmark
    /// before sending the update.
    pub fn update_bookmark(&self, id: u64, changes: BookmarkChanges) -> Result<Bookmark> {
        let tag_names = match &changes.tags {
            TagChange::Keep => None,
            TagChange::Replace(tags) => Some(tags.clone()),
            TagChange::Merge { add, remove } => {
                let current = gateway::bookmarks::get(&self.client, id)?;
                debug!(id, current = ?current.tag_names, ?add, ?remove, "merging tags");
                Some(merge_tags(&current.tag_names, add, remove))
            }
        };

        let update = changes.into_update(tag_names);
        if update.is_empty() {
            return Err(Error::Validation(
                "nothing to update: pass at least one field to change".into(),
            ));
        }
        debug!(id, ?update, "updating bookmark");
        gateway::bookmarks::update(&self.client, id, &update)
    }

    pub fn archive_bookmark(&self, id: u64) -> Result<()> {
        debug!(id, "archiving bookmark");
        gateway::bookmarks::archive(&self.client, id)
    }

    pub fn unarchive_bookmark(&self, id: u64) -> Result<()> {
        debug!(id, "unarchiving bookmark");
        gateway::bookmarks::unarchive(&self.client, id)
    }

    pub fn delete_bookmark(&self, id: u64) -> Result<()> {
        debug!(id, "deleting bookmark");
        gateway::bookmarks::delete(&self.client, id)
    }

    pub fn list_tags(&self, limit: u32, offset: u32) -> Result<Page<Tag>> {
        gateway::tags::list(&self.client, limit, offset)
    }

    pub fn get_tag(&self, id: u64) -> Result<Tag> {
        gateway::tags::get(&self.client, id)
    }

    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("tag name cannot be empty".into()));
        }
        debug!(name, "creating tag");
        gateway::tags::create(&self.client, name)
    }

    pub fn list_bundles(&self) -> Result<Page<Bundle>> {
        gateway::bundles::list(&self.client)
    }

    pub fn get_bundle(&self, id: u64) -> Result<Bundle> {
        gateway::bundles::get(&self.client, id)
    }

    pub fn create_bundle(&self, payload: &BundleCreate) -> Result<Bundle> {
        if payload.name.trim().is_empty() {
            return Err(Error::Validation("bundle name cannot be empty".into()));
        }
        debug!(name = %payload.name, "creating bundle");
        gateway::bundles::create(&self.client, payload)
    }

    pub fn update_bundle(&self, id: u64, payload: &BundleUpdate) -> Result<Bundle> {
        if payload.is_empty() {
            return Err(Error::Validation(
                "nothing to update: pass --name or --description".into(),
            ));
        }
        debug!(id, ?payload, "updating bundle");
        gateway::bundles::update(&self.client, id, payload)
    }

    pub fn delete_bundle(&self, id: u64) -> Result<()> {
        debug!(id, "deleting bundle");
        gateway::bundles::delete(&self.client, id)
    }

    pub fn list_assets(&self, bookmark_id: u64) -> Result<Page<Asset>> {
        gateway::assets::list(&self.client, bookmark_id)
    }

    pub fn get_asset(&self, bookmark_id: u64, asset_id: u64) -> Result<Asset> {
        gateway::assets::get(&self.client, bookmark_id, asset_id)
    }

    pub fn upload_asset(&self, bookmark_id: u64, file: &Path) -> Result<Asset> {
        debug!(bookmark_id, file = %file.display(), "uploading asset");
        gateway::assets::upload(&self.client, bookmark_id, file)
    }

    pub fn download_asset(&self, bookmark_id: u64, asset_id: u64, output: &Path) -> Result<()> {
        debug!(bookmark_id, asset_id, output = %output.display(), "downloading asset");
        gateway::assets::download(&self.client, bookmark_id, asset_id, output)
    }

    pub fn delete_asset(&self, bookmark_id: u64, asset_id: u64) -> Result<()> {
        debug!(bookmark_id, asset_id, "deleting asset");
        gateway::assets::delete(&self.client, bookmark_id, asset_id)
    }

    pub fn profile(&self) -> Result<UserProfile> {
        gateway::user::profile(&self.client)
    }
}

/// Splits a comma-separated tag list, trimming whitespace and dropping empty entries.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merges tag additions and removals into `current`.
///
/// Order is deterministic: existing tags keep their position, additions follow in
/// the order given, duplicates are dropped, and removals are applied last.
pub fn merge_tags(current: &[String], add: &[String], remove: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(current.len() + add.len());
    for tag in current.iter().chain(add) {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged.retain(|tag| !remove.contains(tag));
    merged
}

/// Parses a positive numeric id.
pub fn parse_id(input: &str, what: &str) -> Result<u64> {
    input
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::Validation(format!("invalid {} ID: {}", what, input)))
}

/// Resolves a date filter to an RFC 3339 timestamp.
///
/// Accepts an RFC 3339 timestamp (returned unchanged) or a relative duration of
/// whole hours, days or years before `now` (`24h`, `7d`, `1y`).
pub fn parse_since(input: &str, now: DateTime<Utc>) -> Result<String> {
    let input = input.trim();
    if DateTime::parse_from_rfc3339(input).is_ok() {
        return Ok(input.to_string());
    }

    let invalid = || {
        Error::Validation(format!(
            "invalid date '{}' (use RFC 3339 or relative: 24h, 7d, 30d, 1y)",
            input
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(invalid)?;
    let hours_per_unit = match unit {
        'h' => 1,
        'd' => 24,
        'y' => 365 * 24,
        _ => return Err(invalid()),
    };
    let since = amount
        .checked_mul(hours_per_unit)
        .and_then(Duration::try_hours)
        .and_then(|d| now.checked_sub_signed(d))
        .ok_or_else(invalid)?;
    Ok(since.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::{client, BOOKMARK_42};
    use chrono::TimeZone;
    use httpmock::MockServer;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags(" rust, cli ,,web "), tags(&["rust", "cli", "web"]));
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn merge_keeps_existing_order_then_additions() {
        let merged = merge_tags(&tags(&["b", "a"]), &tags(&["c", "a", "d"]), &[]);
        assert_eq!(merged, tags(&["b", "a", "c", "d"]));
    }

    #[test]
    fn merge_applies_removals_last() {
        let merged = merge_tags(&tags(&["a", "b"]), &tags(&["c"]), &tags(&["a", "c", "zzz"]));
        assert_eq!(merged, tags(&["b"]));
    }

    #[test]
    fn merge_collapses_existing_duplicates() {
        let merged = merge_tags(&tags(&["a", "a", "b"]), &[], &[]);
        assert_eq!(merged, tags(&["a", "b"]));
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("42", "bookmark").unwrap(), 42);
        let err = parse_id("abc", "bookmark").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "invalid bookmark ID: abc");
        assert!(parse_id("0", "bookmark").is_err());
        assert!(parse_id("-3", "bookmark").is_err());
    }

    #[test]
    fn parse_since_accepts_rfc3339_unchanged() {
        let now = Utc::now();
        assert_eq!(
            parse_since("2024-01-01T00:00:00+02:00", now).unwrap(),
            "2024-01-01T00:00:00+02:00"
        );
    }

    #[test]
    fn parse_since_resolves_relative_durations() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(parse_since("24h", now).unwrap(), "2024-03-09T12:00:00Z");
        assert_eq!(parse_since("7d", now).unwrap(), "2024-03-03T12:00:00Z");
        assert_eq!(parse_since("1y", now).unwrap(), "2023-03-11T12:00:00Z");
    }

    #[test]
    fn parse_since_rejects_garbage() {
        let now = Utc::now();
        for input in ["", "yesterday", "7w", "d", "1.5d", "-3d", "2024-01-01"] {
            assert!(
                matches!(parse_since(input, now), Err(Error::Validation(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn update_with_merge_fetches_then_patches() {
        let server = MockServer::start();
        let get_mock = server.mock(|when, then| {
            when.method("GET").path("/api/bookmarks/42/");
            then.status(200)
                .header("content-type", "application/json")
                .body(BOOKMARK_42);
        });
        let patch_mock = server.mock(|when, then| {
            when.method("PATCH")
                .path("/api/bookmarks/42/")
                .json_body(serde_json::json!({"tag_names": ["rust", "cli"]}));
            then.status(200)
                .header("content-type", "application/json")
                .body(BOOKMARK_42);
        });

        let api = LinkdingApi::new(client(&server));
        let changes = BookmarkChanges {
            tags: TagChange::Merge {
                add: tags(&["cli"]),
                remove: vec![],
            },
            ..Default::default()
        };
        api.update_bookmark(42, changes).unwrap();
        get_mock.assert();
        patch_mock.assert();
    }

    #[test]
    fn update_with_replace_skips_fetch() {
        let server = MockServer::start();
        let patch_mock = server.mock(|when, then| {
            when.method("PATCH")
                .path("/api/bookmarks/42/")
                .json_body(serde_json::json!({"title": "New", "tag_names": ["x"], "shared": true}));
            then.status(200)
                .header("content-type", "application/json")
                .body(BOOKMARK_42);
        });

        let api = LinkdingApi::new(client(&server));
        let changes = BookmarkChanges {
            title: Some("New".into()),
            tags: TagChange::Replace(tags(&["x"])),
            shared: Some(true),
            ..Default::default()
        };
        api.update_bookmark(42, changes).unwrap();
        patch_mock.assert();
    }

    #[test]
    fn empty_update_is_rejected_locally() {
        let api = LinkdingApi::new(Client::new("http://127.0.0.1:1", "t").unwrap());
        let err = api.update_bookmark(1, BookmarkChanges::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = api.update_bundle(1, &BundleUpdate::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn blank_tag_name_is_rejected_locally() {
        let api = LinkdingApi::new(Client::new("http://127.0.0.1:1", "t").unwrap());
        assert!(matches!(api.create_tag("  "), Err(Error::Validation(_))));
    }
}
