use crate::client::Client;
use crate::error::Result;
use crate::model::UserProfile;

pub fn profile(client: &Client) -> Result<UserProfile> {
    client.get("/api/user/profile/")
}
