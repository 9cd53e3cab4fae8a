// Record store module: the seam the interactive loop submits through, and
// a small blocking HTTP client for the hosted table behind it. Kept
// synchronous since one record is submitted at a time.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::novel::NovelRecord;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;

/// A row the store created. The identifier type belongs to the store, so it
/// is kept as a raw JSON value.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CreatedNovel {
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: Option<String>,
}

impl CreatedNovel {
    /// Identifier as shown to the user; string ids are printed without quotes.
    pub fn display_id(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Anything that can persist a novel record.
///
/// `Ok(None)` means the call succeeded but no row came back.
pub trait RecordStore {
    fn insert(&self, record: &NovelRecord) -> Result<Option<CreatedNovel>, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn insert(&self, record: &NovelRecord) -> Result<Option<CreatedNovel>, StoreError> {
        (**self).insert(record)
    }
}

/// Client for the hosted table's REST endpoint.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(SupabaseStore {
            client,
            endpoint: config.table_endpoint(),
            api_key: config.api_key.clone(),
        })
    }

    /// Headers every request carries: the key twice (gateway and row level
    /// auth) and a request for the created rows in the response.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let invalid = |_| StoreError::InvalidKey;
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&self.api_key).map_err(invalid)?;
        key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(invalid)?;
        bearer.set_sensitive(true);
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("prefer", HeaderValue::from_static("return=representation"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn insert_request(&self, record: &NovelRecord) -> Result<RequestBuilder, StoreError> {
        Ok(self.client.post(&self.endpoint).headers(self.headers()?).json(record))
    }
}

impl RecordStore for SupabaseStore {
    fn insert(&self, record: &NovelRecord) -> Result<Option<CreatedNovel>, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, title = %record.title, "inserting novel");
        let res = self.insert_request(record)?.send()?;
        let status = res.status();
        let body = res.text()?;
        parse_insert_response(status.as_u16(), &body)
    }
}

/// Interpret the status and body of an insert call. A 2xx body is expected to
/// be an array of created rows; an empty body or array is a successful call
/// that created nothing visible.
pub fn parse_insert_response(status: u16, body: &str) -> Result<Option<CreatedNovel>, StoreError> {
    if !(200..300).contains(&status) {
        return Err(StoreError::Rejected {
            status,
            message: error_message(body),
        });
    }
    if body.trim().is_empty() {
        return Ok(None);
    }
    let rows: Vec<CreatedNovel> = serde_json::from_str(body)?;
    Ok(rows.into_iter().next())
}

// Error bodies are usually JSON with a `message` field; fall back to the raw text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "no response body".into(),
        Err(_) => body.trim().to_string(),
    }
}

/// Wraps a store and shows a spinner on the terminal while an insert runs.
pub struct Spinner<S> {
    inner: S,
}

impl<S> Spinner<S> {
    pub fn new(inner: S) -> Self {
        Spinner { inner }
    }
}

impl<S: RecordStore> RecordStore for Spinner<S> {
    fn insert(&self, record: &NovelRecord) -> Result<Option<CreatedNovel>, StoreError> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Uploading \"{}\"...", record.title));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = self.inner.insert(record);
        spinner.finish_and_clear();
        result
    }
}
