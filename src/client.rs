use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::{ApiError, BridgeError};

/// HTTP side of the bridge: one request per call, JSON in and out, no retries.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let base = Url::parse(config.api_base_url.trim()).map_err(|_| {
            BridgeError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
            }
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(BridgeError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
            });
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|source| BridgeError::ProxySetup {
                proxy: proxy.to_string(),
                source,
            })?;
            builder = builder.proxy(proxy_cfg);
        }
        let http = builder
            .build()
            .map_err(|source| BridgeError::HttpClientBuild { source })?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base endpoint with `segments` appended, each percent-encoded as a
    /// single path segment. `.` and `..` are refused; the URL would silently
    /// drop them.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        if segments.is_empty() {
            return Ok(url);
        }
        if segments.iter().any(|s| crate::product::is_dot_segment(s)) {
            return Err(ApiError::InvalidUrl {
                url: format!("{}/{}", self.base, segments.join("/")),
            });
        }
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, url: Url, params: &[(&str, String)]) -> Result<Value, ApiError> {
        debug!(%url, ?params, "GET");
        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        self.send(request).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<Value, ApiError> {
        debug!(%url, "POST");
        self.send(self.http.post(url).json(body)).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<Value, ApiError> {
        debug!(%url, "PUT");
        self.send(self.http.put(url).json(body)).await
    }

    pub async fn delete(&self, url: Url) -> Result<Value, ApiError> {
        debug!(%url, "DELETE");
        self.send(self.http.delete(url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { source })?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            info!(%url, status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: failure_message(status, &body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { source })?;
        info!(%url, status = status.as_u16(), bytes = body.len(), "request completed");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { source })
    }
}

/// Message for a non-2xx response: the backend's `message`, then its
/// `error`, then the reason phrase of the status.
pub fn failure_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error"].iter().find_map(|key| {
            v.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    });
    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default()
}
