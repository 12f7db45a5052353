//! Per-resource presentation: table columns, plain field sets, and detail blocks.

use super::{Detail, MessageLevel, RecordView};
use crate::model::{Asset, Bookmark, BookmarkCheck, Bundle, Tag, UserProfile};
use super::table::{format_tags, truncate};
use chrono::{DateTime, SecondsFormat, Utc};

const TITLE_WIDTH: usize = 40;
const URL_WIDTH: usize = 50;
const TAGS_WIDTH: usize = 30;
const DESCRIPTION_WIDTH: usize = 50;

/// A record type that can be shown as a table row and as a plain line.
pub trait Listing {
    /// Plural noun used in "Total: N <noun>" and "No <noun> found".
    const NOUN: &'static str;
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
    fn plain_fields(&self) -> Vec<String>;
}

fn day(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn kilobytes(bytes: u64) -> String {
    format!("{} KB", bytes / 1024)
}

impl Listing for Bookmark {
    const NOUN: &'static str = "bookmarks";
    const HEADERS: &'static [&'static str] = &["ID", "Title", "URL", "Tags", "Modified"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(self.display_title(), TITLE_WIDTH),
            truncate(&self.url, URL_WIDTH),
            format_tags(&self.tag_names, TAGS_WIDTH),
            day(&self.date_modified),
        ]
    }

    fn plain_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.url.clone(),
            self.title.clone(),
            self.tag_names.join(","),
        ]
    }
}

impl Listing for Tag {
    const NOUN: &'static str = "tags";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Bookmarks", "Created"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.bookmark_count.to_string(),
            day(&self.date_added),
        ]
    }

    fn plain_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.bookmark_count.to_string()]
    }
}

impl Listing for Bundle {
    const NOUN: &'static str = "bundles";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description", "Created"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            truncate(&self.description, DESCRIPTION_WIDTH),
            day(&self.date_added),
        ]
    }

    fn plain_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.description.clone()]
    }
}

impl Listing for Asset {
    const NOUN: &'static str = "assets";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Size", "Status", "Created"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.display_name.clone(),
            kilobytes(self.file_size),
            self.status.clone(),
            day(&self.date_created),
        ]
    }

    fn plain_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.display_name.clone(),
            self.file_size.to_string(),
            self.status.clone(),
        ]
    }
}

pub fn bookmark(b: &Bookmark) -> RecordView {
    let detail = Detail::new()
        .heading(format!("Bookmark #{}", b.id))
        .blank()
        .field("URL", &b.url)
        .field("Title", b.display_title())
        .field_if("Description", &b.description)
        .field_if("Notes", &b.notes)
        .field_if("Tags", &b.tag_names.join(", "))
        .field("Archived", b.is_archived)
        .field("Unread", b.unread)
        .field("Shared", b.shared)
        .field("Added", timestamp(&b.date_added))
        .field("Modified", timestamp(&b.date_modified));
    RecordView {
        plain: vec![
            b.id.to_string(),
            b.url.clone(),
            b.title.clone(),
            b.description.clone(),
            b.notes.clone(),
            b.tag_names.join(","),
        ],
        detail,
    }
}

/// Result of creating or updating a bookmark, with `banner` as the success line.
pub fn bookmark_saved(b: &Bookmark, banner: &str) -> RecordView {
    let detail = Detail::new()
        .success(banner)
        .blank()
        .field("ID", b.id)
        .field("Title", b.display_title())
        .field("URL", &b.url)
        .field_if("Tags", &b.tag_names.join(", "));
    RecordView {
        plain: vec![b.id.to_string(), b.url.clone(), b.title.clone()],
        detail,
    }
}

pub fn bookmark_check(check: &BookmarkCheck, url: &str) -> RecordView {
    match &check.bookmark {
        Some(existing) => RecordView {
            plain: vec!["exists".to_string(), existing.id.to_string()],
            detail: Detail::new()
                .message(MessageLevel::Warning, "Bookmark already exists!")
                .blank()
                .field("ID", existing.id)
                .field("Title", existing.display_title())
                .field("Tags", existing.tag_names.join(", ")),
        },
        None => {
            let mut detail = Detail::new()
                .success("URL not bookmarked yet")
                .blank()
                .section("Scraped metadata")
                .item("Title", &check.metadata.title)
                .item("Description", &check.metadata.description);
            if !check.auto_tags.is_empty() {
                detail = detail.item("Suggested tags", check.auto_tags.join(", "));
            }
            detail = detail
                .blank()
                .message(MessageLevel::Info, format!("Create with: clinkding bookmarks create {}", url));
            RecordView {
                plain: vec![
                    "new".to_string(),
                    check.metadata.title.clone(),
                    check.metadata.description.clone(),
                ],
                detail,
            }
        }
    }
}

pub fn tag(t: &Tag) -> RecordView {
    RecordView {
        plain: vec![t.id.to_string(), t.name.clone(), t.bookmark_count.to_string()],
        detail: Detail::new()
            .heading(format!("Tag #{}", t.id))
            .blank()
            .field("Name", &t.name)
            .field("Bookmarks", t.bookmark_count)
            .field("Created", timestamp(&t.date_added)),
    }
}

pub fn tag_created(t: &Tag) -> RecordView {
    RecordView {
        plain: vec![t.id.to_string(), t.name.clone()],
        detail: Detail::new()
            .success("Tag created!")
            .blank()
            .field("ID", t.id)
            .field("Name", &t.name),
    }
}

pub fn bundle(b: &Bundle) -> RecordView {
    RecordView {
        plain: vec![b.id.to_string(), b.name.clone(), b.description.clone()],
        detail: Detail::new()
            .heading(format!("Bundle #{}", b.id))
            .blank()
            .field("Name", &b.name)
            .field_if("Description", &b.description)
            .field("Created", timestamp(&b.date_added)),
    }
}

pub fn bundle_saved(b: &Bundle, banner: &str) -> RecordView {
    RecordView {
        plain: vec![b.id.to_string(), b.name.clone()],
        detail: Detail::new()
            .success(banner)
            .blank()
            .field("ID", b.id)
            .field("Name", &b.name)
            .field_if("Description", &b.description),
    }
}

pub fn asset(a: &Asset) -> RecordView {
    RecordView {
        plain: vec![a.id.to_string(), a.display_name.clone(), a.file_size.to_string()],
        detail: Detail::new()
            .heading(format!("Asset #{}", a.id))
            .blank()
            .field("Bookmark ID", a.bookmark_id)
            .field("Name", &a.display_name)
            .field("File", &a.file)
            .field("Size", kilobytes(a.file_size))
            .field("Status", &a.status)
            .field("Created", timestamp(&a.date_created)),
    }
}

pub fn asset_uploaded(a: &Asset) -> RecordView {
    RecordView {
        plain: vec![a.id.to_string(), a.display_name.clone()],
        detail: Detail::new()
            .success("Asset uploaded!")
            .blank()
            .field("Asset ID", a.id)
            .field("Bookmark ID", a.bookmark_id)
            .field("Name", &a.display_name)
            .field("Size", kilobytes(a.file_size)),
    }
}

pub fn profile(p: &UserProfile) -> RecordView {
    let prefs = &p.search_preferences;
    RecordView {
        plain: vec![
            p.theme.clone(),
            p.bookmark_date_display.clone(),
            p.enable_sharing.to_string(),
            p.enable_favicons.to_string(),
        ],
        detail: Detail::new()
            .heading("User Profile")
            .blank()
            .section("Appearance")
            .item("Theme", &p.theme)
            .item("Bookmark date display", &p.bookmark_date_display)
            .item("Bookmark link target", &p.bookmark_link_target)
            .blank()
            .section("Features")
            .item("Sharing enabled", p.enable_sharing)
            .item("Public sharing", p.enable_public_sharing)
            .item("Favicons enabled", p.enable_favicons)
            .item("Preview images", p.enable_preview_images)
            .item("Display URL", p.display_url)
            .item("Display viewed date", p.display_viewed_date)
            .item("Permanent notes", p.permanent_notes)
            .blank()
            .section("Web Archive")
            .item("Integration", &p.web_archive_integration)
            .blank()
            .section("Search Preferences")
            .item("Sort", &prefs.sort)
            .item("Shared bookmarks", &prefs.shared)
            .item("Unread", &prefs.unread),
    }
}
