use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::path::Path;

const BOOKMARK: &str = r#"{"id":42,"url":"https://example.com","title":"Example","description":"A test page","notes":"","website_title":"","website_description":"","is_archived":false,"unread":false,"shared":false,"tag_names":["rust","cli"],"date_added":"2024-01-15T10:30:00Z","date_modified":"2024-01-16T08:00:00Z"}"#;

fn page(results: &str, count: usize) -> String {
    format!(r#"{{"count":{},"next":null,"previous":null,"results":[{}]}}"#, count, results)
}

/// A command isolated from the user's environment: no real config, no credentials, no color.
fn clinkding(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clinkding").unwrap();
    cmd.env_remove("LINKDING_URL")
        .env_remove("LINKDING_TOKEN")
        .env_remove("LINKDING_CONFIG")
        .env_remove("CLINKDING_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config_dir.join("config.yaml"));
    cmd
}

fn authed(config_dir: &Path, server: &MockServer) -> Command {
    let mut cmd = clinkding(config_dir);
    cmd.env("LINKDING_URL", server.base_url())
        .env("LINKDING_TOKEN", "secret-token");
    cmd
}

#[test]
fn test_plain_bookmark_list() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/bookmarks/")
            .query_param("limit", "100")
            .header("authorization", "Token secret-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(page(BOOKMARK, 1));
    });
    // A zero offset is left out of the query string.
    let zero_offset = server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/").query_param("offset", "0");
        then.status(500);
    });

    authed(dir.path(), &server)
        .args(["--plain", "bookmarks", "list"])
        .assert()
        .success()
        .stdout("42\thttps://example.com\tExample\trust,cli\n");
    mock.assert();
    zero_offset.assert_calls(0);
}

#[test]
fn test_bad_flag_value_exits_with_1() {
    let dir = tempfile::tempdir().unwrap();

    clinkding(dir.path())
        .args(["bookmarks", "list", "--limit", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value 'abc'"));
}

#[test]
fn test_help_exits_with_0() {
    let dir = tempfile::tempdir().unwrap();

    clinkding(dir.path())
        .args(["bookmarks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_pagination_hint_at_max_offset() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/");
        then.status(200).body(format!(
            r#"{{"count":2,"next":"http://example/next","previous":null,"results":[{}]}}"#,
            BOOKMARK
        ));
    });

    authed(dir.path(), &server)
        .args(["bookmarks", "list", "--offset", "4294967295", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --offset 4294967295 to see more"));
}

#[test]
fn test_human_bookmark_list_shows_table_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/").query_param("q", "rust");
        then.status(200).body(page(BOOKMARK, 1));
    });

    authed(dir.path(), &server)
        .args(["bookmarks", "list", "-Q", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("Example"))
        .stdout(predicate::str::contains("2024-01-16"))
        .stdout(predicate::str::contains("Total: 1 bookmarks"));
}

#[test]
fn test_json_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/archived/");
        then.status(200).body(page("", 0));
    });

    authed(dir.path(), &server)
        .args(["--json", "bookmarks", "list", "--archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"))
        .stdout(predicate::str::contains("\"results\": []"));
}

#[test]
fn test_not_found_exits_with_4() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/999/");
        then.status(404).body(r#"{"detail":"Bookmark not found"}"#);
    });

    authed(dir.path(), &server)
        .args(["bookmarks", "get", "999"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Error: Bookmark not found"));
}

#[test]
fn test_unauthorized_exits_with_3() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tags/");
        then.status(401).body(r#"{"detail":"Invalid token."}"#);
    });

    authed(dir.path(), &server)
        .args(["tags", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn test_missing_url_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();

    clinkding(dir.path())
        .args(["bookmarks", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clinkding config init"));
}

#[test]
fn test_invalid_id_makes_no_request() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();

    // An unmatched request would come back as a 404 and exit with 4.
    authed(dir.path(), &server)
        .args(["bookmarks", "get", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid bookmark ID: abc"));
}

#[test]
fn test_config_file_supplies_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    std::fs::write(
        dir.path().join("config.yaml"),
        format!("url: {}\ntoken: file-token\n", server.base_url()),
    )
    .unwrap();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/bookmarks/42/")
            .header("authorization", "Token file-token");
        then.status(200).body(BOOKMARK);
    });

    clinkding(dir.path())
        .args(["bookmarks", "get", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example"))
        .stdout(predicate::str::contains("rust, cli"));
    mock.assert();
}

#[test]
fn test_flags_override_environment() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/bookmarks/42/")
            .header("authorization", "Token flag-token");
        then.status(200).body(BOOKMARK);
    });

    authed(dir.path(), &server)
        .args(["--plain", "bookmarks", "get", "42", "--token", "flag-token"])
        .assert()
        .success();
    mock.assert();
}

#[test]
fn test_forced_delete_skips_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let lookup = server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/7/");
        then.status(200).body(BOOKMARK);
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/bookmarks/7/");
        then.status(204);
    });

    authed(dir.path(), &server)
        .args(["bookmarks", "delete", "7", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmark #7 deleted"));
    delete.assert();
    lookup.assert_calls(0);
}

#[test]
fn test_update_with_add_tags_merges_current_tags() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/42/");
        then.status(200).body(BOOKMARK);
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/bookmarks/42/")
            .json_body_includes(r#"{"tag_names":["cli","web"]}"#);
        then.status(200).body(BOOKMARK);
    });

    authed(dir.path(), &server)
        .args(["--plain", "bookmarks", "update", "42", "--add-tags", "web", "--remove-tags", "rust"])
        .assert()
        .success();
    patch.assert();
}

#[test]
fn test_empty_update_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();

    authed(dir.path(), &server)
        .args(["bookmarks", "update", "42"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_upload_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let missing = dir.path().join("nope.pdf");

    authed(dir.path(), &server)
        .args(["assets", "upload", "42"])
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.pdf"));
}

#[test]
fn test_asset_download_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/bookmarks/42/assets/3/download/");
        then.status(200).body("<html>snapshot</html>");
    });
    let target = dir.path().join("snapshot.html");

    authed(dir.path(), &server)
        .args(["assets", "download", "42", "3", "-o"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Asset downloaded to:"));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "<html>snapshot</html>");
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();

    clinkding(dir.path())
        .env("LINKDING_URL", "https://links.example.com")
        .env("LINKDING_TOKEN", "abcd1234efgh5678")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://links.example.com"))
        .stdout(predicate::str::contains("abcd****5678"))
        .stdout(predicate::str::contains("abcd1234efgh5678").not());
}

#[test]
fn test_user_profile_json() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/user/profile/");
        then.status(200).body(r#"{"theme":"dark","bookmark_date_display":"relative","enable_sharing":true}"#);
    });

    authed(dir.path(), &server)
        .args(["--json", "user", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\": \"dark\""));
}
