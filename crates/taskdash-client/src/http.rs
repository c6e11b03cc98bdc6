//! Thin HTTP layer shared by every resource operation.
//!
//! Builds URLs from the configured base, issues the request, and normalizes
//! the response: parsed JSON on success, `None` when there is no content, and
//! [`ApiError::Http`] for anything outside 2xx. There is no retry, caching or
//! batching here; every failure is returned to the caller as-is.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ApiConfig, ConfigError};
use crate::error::ApiError;

/// A request against the task API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    params: Vec<(&'static str, Option<String>)>,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl ApiRequest {
    /// A request with an explicit method.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH` request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter. `None` and empty values are dropped when the
    /// URL is built.
    pub fn param(mut self, key: &'static str, value: Option<String>) -> Self {
        self.params.push((key, value));
        self
    }

    /// Add several query parameters.
    pub fn params(mut self, pairs: impl IntoIterator<Item = (&'static str, Option<String>)>) -> Self {
        self.params.extend(pairs);
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|source| ApiError::Encode {
            endpoint: self.endpoint(),
            source,
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Add a header. Caller headers override the JSON content type.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// `"METHOD /path"` label used in logs and errors.
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// Build an absolute URL from a normalized base, a path and query pairs.
///
/// Pairs whose value is `None` or empty are omitted entirely rather than
/// serialized as `key=`.
pub fn build_url<'a, I>(base_url: &str, path: &str, params: I) -> Result<Url, ConfigError>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let raw = format!("{base_url}{path}");
    let mut url =
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(raw.clone(), e.to_string()))?;

    let present: Vec<(&str, &str)> = params
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect();

    if !present.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in present {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ApiError::Transport {
            endpoint: "client_init".into(),
            source: e,
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// The resolved base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ConfigError> {
        build_url(
            &self.base_url,
            &request.path,
            request.params.iter().map(|(k, v)| (*k, v.as_deref())),
        )
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// Returns `Ok(None)` for `204 No Content` (without reading the body) and
    /// for an empty 2xx body.
    pub async fn request(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let endpoint = request.endpoint();
        let url = self.url_for(&request)?;

        let mut headers = HeaderMap::new();
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self.http.request(request.method, url.clone()).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        tracing::debug!(%endpoint, %url, "sending task API request");

        let resp = builder.send().await.map_err(|e| {
            tracing::warn!(%endpoint, error = %e, "task API request did not complete");
            ApiError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            }
        })?;

        let status = resp.status();
        tracing::debug!(%endpoint, status = status.as_u16(), "task API response");

        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(%endpoint, status = status.as_u16(), error = %e, "could not read task API error body");
                    String::new()
                }
            };
            let err = ApiError::http(endpoint.clone(), status.as_u16(), &body);
            tracing::warn!(%endpoint, status = status.as_u16(), error = %err, "task API returned an error");
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = resp.text().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    /// Send a request whose response must carry a body, decoded as `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let endpoint = request.endpoint();
        match self.request(request).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|source| ApiError::Decode { endpoint, source })
            }
            None => Err(ApiError::EmptyBody { endpoint }),
        }
    }
}
