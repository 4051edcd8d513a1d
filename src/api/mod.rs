//! REST API client.
//!
//! A thin wrapper over `reqwest` that resolves endpoint paths against the
//! configured base URL, attaches the session bearer token, and normalizes every
//! failure into an [`HttpError`].

pub mod urls;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::HttpError;
use crate::models::ListQuery;
use crate::storage::{ClientStorage, TOKEN_KEY};

/// Header carrying a per-request id, for correlating client and server logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// One request to the API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    with_credentials: bool,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            with_credentials: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn query(mut self, query: &ListQuery) -> Self {
        self.query.extend(query.to_pairs());
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, HttpError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send the request without the bearer token.
    pub fn without_credentials(mut self) -> Self {
        self.with_credentials = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// HTTP client for the logbook API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    storage: Arc<dyn ClientStorage>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url`, reading credentials from `storage`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        storage: Arc<dyn ClientStorage>,
    ) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: crate::config::normalize_api_url(base_url),
            http,
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue `request` and decode the JSON response into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, HttpError> {
        let url = self.endpoint(&request.path);
        let request_id = Uuid::new_v4().simple().to_string();

        let mut builder = self
            .http
            .request(request.method.clone(), url.as_str())
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.with_credentials {
            if let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
                builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(request_id = %request_id, "{} {}", request.method, url);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    "{} {} failed: {}",
                    request.method,
                    url,
                    err
                );
                return Err(HttpError::transport(err.to_string()));
            }
        };

        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| HttpError::transport(err.to_string()))?;

    if !status.is_success() {
        let message = error_message(&bytes)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        return Err(HttpError::status(status.as_u16(), message));
    }

    // Empty bodies (204) decode as JSON null
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|err| HttpError::decode(status.as_u16(), err.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{ "message": "..." }` and `{ "message": ["...", "..."] }`,
/// falling back to the raw body text.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        match value.get("message") {
            Some(serde_json::Value::String(message)) => return Some(message.clone()),
            Some(serde_json::Value::Array(parts)) => {
                let joined = parts
                    .iter()
                    .filter_map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}
