use crate::client::{build_url, Client};
use crate::error::Result;
use crate::model::{Bookmark, BookmarkCheck, BookmarkCreate, BookmarkUpdate, Page};

const BOOKMARKS: &str = "/api/bookmarks/";
const ARCHIVED: &str = "/api/bookmarks/archived/";

/// Filters for listing bookmarks. Zero and empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub query: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub archived: bool,
    /// RFC 3339 timestamp
    pub modified_since: Option<String>,
    /// RFC 3339 timestamp
    pub added_since: Option<String>,
    pub bundle: Option<u64>,
}

impl ListOptions {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        if self.limit > 0 {
            params.push(("limit", self.limit.to_string()));
        }
        if self.offset > 0 {
            params.push(("offset", self.offset.to_string()));
        }
        if let Some(since) = self.modified_since.as_deref().filter(|s| !s.is_empty()) {
            params.push(("modified_since", since.to_string()));
        }
        if let Some(since) = self.added_since.as_deref().filter(|s| !s.is_empty()) {
            params.push(("added_since", since.to_string()));
        }
        if let Some(bundle) = self.bundle.filter(|b| *b > 0) {
            params.push(("bundle", bundle.to_string()));
        }
        params
    }
}

fn item(id: u64) -> String {
    format!("{}{}/", BOOKMARKS, id)
}

pub fn list(client: &Client, opts: &ListOptions) -> Result<Page<Bookmark>> {
    let base = if opts.archived { ARCHIVED } else { BOOKMARKS };
    client.get(&build_url(base, &opts.params()))
}

pub fn get(client: &Client, id: u64) -> Result<Bookmark> {
    client.get(&item(id))
}

pub fn check(client: &Client, url: &str) -> Result<BookmarkCheck> {
    client.get(&build_url(
        "/api/bookmarks/check/",
        &[("url", url.to_string())],
    ))
}

pub fn create(client: &Client, payload: &BookmarkCreate, disable_scraping: bool) -> Result<Bookmark> {
    let params = if disable_scraping {
        vec![("disable_scraping", "true".to_string())]
    } else {
        Vec::new()
    };
    let path = build_url(BOOKMARKS, &params);
    client.post(&path, Some(payload))
}

pub fn update(client: &Client, id: u64, payload: &BookmarkUpdate) -> Result<Bookmark> {
    client.patch(&item(id), payload)
}

pub fn archive(client: &Client, id: u64) -> Result<()> {
    client.post_empty(&format!("{}{}/archive/", BOOKMARKS, id))
}

pub fn unarchive(client: &Client, id: u64) -> Result<()> {
    client.post_empty(&format!("{}{}/unarchive/", BOOKMARKS, id))
}

pub fn delete(client: &Client, id: u64) -> Result<()> {
    client.delete(&item(id))
}
