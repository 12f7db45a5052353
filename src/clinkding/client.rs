//! # Transport Client
//!
//! Authenticated, synchronous HTTP access to a linkding instance. Every call goes to
//! `base_url + path`, carries `Authorization: Token <token>`, and is bounded by a fixed
//! timeout. Responses are classified with [`crate::error::classify`] before decoding.
//!
//! Uploads and downloads stream through bounded buffers; neither holds a whole file in
//! memory.
//!
//! This module never logs and never prints; callers decide what to report.

use crate::error::{classify, Error, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("clinkding/", env!("CARGO_PKG_VERSION"));

/// Appends `params` to `path` as a query string, keeping their order.
///
/// The `?` is only added when there is at least one parameter.
pub fn build_url(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!("{}?{}", path, query.finish())
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::Validation(format!("invalid linkding URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "invalid linkding URL '{}': expected http or https",
                base_url
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Token {}", token.trim()))
            .map_err(|_| Error::Validation("API token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(network)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        self.execute(self.http.get(self.url(path)))
    }

    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned + Default>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request)
    }

    /// POST without a body, discarding whatever the server returns.
    pub fn post_empty(&self, path: &str) -> Result<()> {
        let response = self.send(self.http.post(self.url(path)))?;
        check(response).map(|_| ())
    }

    pub fn patch<B: Serialize + ?Sized, T: DeserializeOwned + Default>(&self, path: &str, body: &B) -> Result<T> {
        self.execute(self.http.patch(self.url(path)).json(body))
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(self.http.delete(self.url(path)))?;
        check(response).map(|_| ())
    }

    /// Streams `file` to `path` as the multipart field `file`.
    ///
    /// The file is opened before any request is made, so a missing file never
    /// reaches the network.
    pub fn upload_file<T: DeserializeOwned + Default>(&self, path: &str, file: &Path) -> Result<T> {
        let handle = File::open(file).map_err(|e| Error::filesystem(file, e))?;
        let length = handle
            .metadata()
            .map_err(|e| Error::filesystem(file, e))?
            .len();
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(file).first_or_octet_stream();

        let part = Part::reader_with_length(handle, length)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(network)?;
        let form = Form::new().part("file", part);

        self.execute(self.http.post(self.url(path)).multipart(form))
    }

    /// Streams the body of `path` into `output`, replacing any existing file.
    ///
    /// The status is checked first; the output file is only created for a 2xx.
    pub fn download_file(&self, path: &str, output: &Path) -> Result<()> {
        let mut response = self.send(self.http.get(self.url(path)))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.bytes().map_err(network)?;
            return Err(classify(status, &body).unwrap_or(Error::Request {
                status,
                message: format!("API request failed with status {}", status),
            }));
        }

        let file = File::create(output).map_err(|e| Error::filesystem(output, e))?;
        let mut writer = BufWriter::new(file);
        io::copy(&mut response, &mut writer).map_err(|e| Error::filesystem(output, e))?;
        writer.flush().map_err(|e| Error::filesystem(output, e))?;
        Ok(())
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().map_err(network)
    }

    fn execute<T: DeserializeOwned + Default>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request)?;
        let body = check(response)?;
        decode(&body)
    }
}

fn network(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network(format!(
            "timed out after {}s: {}",
            REQUEST_TIMEOUT.as_secs(),
            err
        ))
    } else {
        Error::Network(err.to_string())
    }
}

/// Reads the whole body and turns a non-2xx status into an error.
fn check(response: Response) -> Result<Vec<u8>> {
    let status = response.status().as_u16();
    let no_content = status == 204;
    let body = response.bytes().map_err(network)?;
    if let Some(err) = classify(status, &body) {
        return Err(err);
    }
    if no_content {
        return Ok(Vec::new());
    }
    Ok(body.to_vec())
}

/// Decodes a 2xx body. A 204 or an empty body skips decoding and yields `T::default()`.
fn decode<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}
