use crate::client::Client;
use crate::error::Result;
use crate::model::{Asset, Page};
use std::path::Path;

fn collection(bookmark_id: u64) -> String {
    format!("/api/bookmarks/{}/assets/", bookmark_id)
}

fn item(bookmark_id: u64, asset_id: u64) -> String {
    format!("/api/bookmarks/{}/assets/{}/", bookmark_id, asset_id)
}

pub fn list(client: &Client, bookmark_id: u64) -> Result<Page<Asset>> {
    client.get(&collection(bookmark_id))
}

pub fn get(client: &Client, bookmark_id: u64, asset_id: u64) -> Result<Asset> {
    client.get(&item(bookmark_id, asset_id))
}

pub fn upload(client: &Client, bookmark_id: u64, file: &Path) -> Result<Asset> {
    client.upload_file(&format!("{}upload/", collection(bookmark_id)), file)
}

pub fn download(client: &Client, bookmark_id: u64, asset_id: u64, output: &Path) -> Result<()> {
    client.download_file(&format!("{}download/", item(bookmark_id, asset_id)), output)
}

pub fn delete(client: &Client, bookmark_id: u64, asset_id: u64) -> Result<()> {
    client.delete(&item(bookmark_id, asset_id))
}
