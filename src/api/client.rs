/// Blocking HTTP client for the parking backend's admin endpoints.
///
/// Uses the synchronous `ureq` client. Every call issues exactly one request;
/// there is no retry and, unless `api.timeout_ms` is set, no timeout beyond
/// the transport's own defaults.
use std::time::Duration;

use anyhow::{Context, Result};

use super::{HttpReply, SpotApi, SpotId};
use crate::config::schema::ApiConfig;

/// `ureq`-backed [`SpotApi`].
#[derive(Debug, Clone)]
pub struct HttpSpotApi {
    base_url: String,
    timeout: Option<Duration>,
    session_cookie: Option<String>,
}

impl HttpSpotApi {
    /// Build a client from the resolved `[api]` config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            session_cookie: Some(config.session_cookie.clone()).filter(|c| !c.is_empty()),
        }
    }

    /// Build a client for `base_url` with transport defaults.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the spot-details endpoint for `spot_id`.
    pub fn details_url(&self, spot_id: &SpotId) -> String {
        format!("{}/admin/spot-details/{}", self.base_url, spot_id)
    }

    /// URL of the delete endpoint for `spot_id`.
    pub fn delete_url(&self, spot_id: &SpotId) -> String {
        format!("{}/admin/delete_spot/{}", self.base_url, spot_id)
    }

    /// Check whether the backend answers at all (any status counts).
    ///
    /// Uses a short timeout so `spotpanel health` doesn't hang on a dead host.
    pub fn is_reachable(&self) -> bool {
        match ureq::get(&self.base_url)
            .timeout(Duration::from_secs(5))
            .call()
        {
            Ok(_) | Err(ureq::Error::Status(_, _)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    }

    fn prepare(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = ureq::request(method, url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(cookie) = &self.session_cookie {
            request = request.set("Cookie", cookie);
        }
        request
    }

    fn exchange(&self, request: ureq::Request) -> Result<HttpReply> {
        let url = request.url().to_string();
        let response = match request.call() {
            Ok(response) => response,
            // 4xx/5xx still carry a body the panel wants to read.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(anyhow::Error::new(transport)
                    .context(format!("request to {url} failed")));
            }
        };

        let status = response.status();
        let body = response
            .into_string()
            .with_context(|| format!("failed to read response body from {url}"))?;

        Ok(HttpReply { status, body })
    }
}

impl SpotApi for HttpSpotApi {
    fn fetch_details(&self, spot_id: &SpotId) -> Result<HttpReply> {
        let url = self.details_url(spot_id);
        self.exchange(self.prepare("GET", &url))
    }

    fn delete_spot(&self, spot_id: &SpotId) -> Result<HttpReply> {
        let url = self.delete_url(spot_id);
        self.exchange(self.prepare("POST", &url))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
