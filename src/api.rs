// API client module: async wrappers around the recognition server's HTTP
// endpoints. Each method maps to exactly one endpoint and hands back the
// JSON payload untouched; the server owns the shape of tracks, locators,
// training sets and disabled lists.

use crate::config::Config;
use crate::error::NetworkError;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Frame step sent with every `track` request.
pub const SPEEDUP: u32 = 25;

/// Async API client holding a reqwest client and the base URL of the
/// recognition server. Cloning is cheap and clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Query string of the `track` endpoint.
#[derive(Serialize, Debug)]
pub struct TrackParams<'a> {
    pub video: &'a str,
    pub project: &'a str,
    pub speedup: u32,
}

impl ApiClient {
    /// Create a client for `base_url`. Endpoint paths are appended to it
    /// verbatim, so it should end with `/`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        ApiClient::new(config.api.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run tracking of `video` against the classifier of `project`.
    pub async fn recognise(&self, video: &str, project: &str) -> Result<Value, NetworkError> {
        let url = self.endpoint("track");
        let params = TrackParams {
            video,
            project,
            speedup: SPEEDUP,
        };
        let req = self.client.get(&url).query(&params);
        send(url, req).await
    }

    /// Locator of a video. Returns an empty string without contacting the
    /// server when no video is given.
    pub async fn get_locator(&self, video: Option<&str>) -> Result<Value, NetworkError> {
        let video = match present(video) {
            Some(video) => video,
            None => return Ok(Value::String(String::new())),
        };
        let url = self.endpoint("get_locator");
        let req = self.client.get(&url).query(&[("video", video)]);
        send(url, req).await
    }

    /// Training set of a project. Returns an empty list without contacting
    /// the server when no project is given.
    pub async fn get_training_set(&self, project: Option<&str>) -> Result<Value, NetworkError> {
        let project = match present(project) {
            Some(project) => project,
            None => return Ok(Value::Array(Vec::new())),
        };
        let url = self.endpoint("training-set");
        let req = self.client.get(&url).query(&[("project", project)]);
        send(url, req).await
    }

    pub async fn get_projects(&self) -> Result<Value, NetworkError> {
        let url = self.endpoint("projects");
        let req = self.client.get(&url);
        send(url, req).await
    }

    /// Replace the disabled list of `project`. The list is posted as the
    /// JSON body unchanged.
    pub async fn set_disabled<T: Serialize>(
        &self,
        project: &str,
        list: &[T],
    ) -> Result<Value, NetworkError> {
        let url = self.endpoint(&format!("disabled/{project}"));
        let req = self.client.post(&url).json(list);
        send(url, req).await
    }

    pub async fn get_disabled(&self, project: &str) -> Result<Value, NetworkError> {
        let url = self.endpoint(&format!("disabled/{project}"));
        let req = self.client.get(&url);
        send(url, req).await
    }

    /// Ask the server to crawl for `q`. An empty query is still sent.
    pub async fn crawl(&self, q: &str) -> Result<Value, NetworkError> {
        let url = self.endpoint("crawler");
        let req = self.client.get(&url).query(&[("q", q)]);
        send(url, req).await
    }
}

/// `None` for a missing or empty identifier.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Send the request and parse the body as JSON. An empty body is `""`.
async fn send(url: String, req: RequestBuilder) -> Result<Value, NetworkError> {
    debug!(%url, "sending request");
    let res = match req.send().await {
        Ok(res) => res,
        Err(source) => return Err(NetworkError::Transport { url, source }),
    };

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        debug!(%url, %status, "request rejected");
        return Err(NetworkError::Status { url, status, body });
    }

    let bytes = match res.bytes().await {
        Ok(bytes) => bytes,
        Err(source) => return Err(NetworkError::Transport { url, source }),
    };
    if bytes.is_empty() {
        return Ok(Value::String(String::new()));
    }
    serde_json::from_slice(&bytes).map_err(|source| NetworkError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_treats_empty_as_missing() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("0")), Some("0"));
        assert_eq!(present(Some("video.mp4")), Some("video.mp4"));
    }

    #[test]
    fn endpoints_append_to_base() {
        let api = ApiClient::new("http://host/").unwrap();
        assert_eq!(api.endpoint("track"), "http://host/track");
        assert_eq!(api.endpoint("disabled/proj1"), "http://host/disabled/proj1");
    }

    #[test]
    fn client_from_config_uses_normalized_base() {
        let api = ApiClient::from_config(&Config::new("http://host:5000")).unwrap();
        assert_eq!(api.base_url(), "http://host:5000/");
    }

    #[test]
    fn track_params_carry_fixed_speedup() {
        let params = TrackParams {
            video: "v",
            project: "p",
            speedup: SPEEDUP,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"video": "v", "project": "p", "speedup": 25}));
    }
}
