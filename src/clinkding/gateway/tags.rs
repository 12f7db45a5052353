use crate::client::{build_url, Client};
use crate::error::Result;
use crate::model::{Page, Tag, TagCreate};

const TAGS: &str = "/api/tags/";

pub fn list(client: &Client, limit: u32, offset: u32) -> Result<Page<Tag>> {
    let mut params = Vec::new();
    if limit > 0 {
        params.push(("limit", limit.to_string()));
    }
    if offset > 0 {
        params.push(("offset", offset.to_string()));
    }
    client.get(&build_url(TAGS, &params))
}

pub fn get(client: &Client, id: u64) -> Result<Tag> {
    client.get(&format!("{}{}/", TAGS, id))
}

pub fn create(client: &Client, name: &str) -> Result<Tag> {
    let payload = TagCreate {
        name: name.to_string(),
    };
    client.post(TAGS, Some(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::client;
    use httpmock::MockServer;

    const RUST_TAG: &str = r#"{"id":1,"name":"rust","date_added":"2024-01-01T00:00:00Z","bookmark_count":12}"#;

    #[test]
    fn list_sends_limit_and_offset() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/tags/")
                .query_param("limit", "50")
                .query_param("offset", "100");
            then.status(200)
                .header("content-type", "application/json")
                .body(format!(r#"{{"count":101,"next":null,"previous":null,"results":[{}]}}"#, RUST_TAG));
        });

        let page = list(&client(&server), 50, 100).unwrap();
        mock.assert();
        assert_eq!(page.count, 101);
        assert_eq!(page.results[0].bookmark_count, 12);
    }

    #[test]
    fn create_posts_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/api/tags/")
                .json_body_includes(r#"{"name":"rust"}"#);
            then.status(201)
                .header("content-type", "application/json")
                .body(RUST_TAG);
        });

        let tag = create(&client(&server), "rust").unwrap();
        mock.assert();
        assert_eq!(tag.id, 1);
    }
}
