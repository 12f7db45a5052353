use crate::client::Client;
use crate::error::Result;
use crate::model::{Bundle, BundleCreate, BundleUpdate, Page};

const BUNDLES: &str = "/api/bundles/";

fn item(id: u64) -> String {
    format!("{}{}/", BUNDLES, id)
}

pub fn list(client: &Client) -> Result<Page<Bundle>> {
    client.get(BUNDLES)
}

pub fn get(client: &Client, id: u64) -> Result<Bundle> {
    client.get(&item(id))
}

pub fn create(client: &Client, payload: &BundleCreate) -> Result<Bundle> {
    client.post(BUNDLES, Some(payload))
}

pub fn update(client: &Client, id: u64, payload: &BundleUpdate) -> Result<Bundle> {
    client.patch(&item(id), payload)
}

pub fn delete(client: &Client, id: u64) -> Result<()> {
    client.delete(&item(id))
}
