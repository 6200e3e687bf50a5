/// Configuration schema and defaults for spotpanel.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[api]`, `[panel]`, `[web]`, and `[logging]`.
///
/// Every field has a built-in default, so a config file only needs the keys
/// it wants to override.
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level spotpanel configuration.
///
/// Maps directly to `~/.spotpanel/config.toml` and `.spotpanel.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub api: ApiConfig,
    pub panel: PanelSettings,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Connection settings for the parking backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the parking backend; the admin endpoints hang off it.
    pub base_url: String,
    /// Request timeout in milliseconds. `0` leaves the transport default.
    pub timeout_ms: u64,
    /// Raw `Cookie` header value forwarded on every request (admin session).
    pub session_cookie: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 0,
            session_cookie: String::new(),
        }
    }
}

impl ApiConfig {
    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

// ---------------------------------------------------------------------------
// [panel]
// ---------------------------------------------------------------------------

/// Rendering settings for the details panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Prefix shown before the parking cost of the current booking.
    pub currency_symbol: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded web host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `spotpanel serve`.
    pub addr: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Panel event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether panel events are appended to the JSONL log.
    pub enabled: bool,
    /// Path to the event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.spotpanel/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default annotated TOML
// ---------------------------------------------------------------------------

impl PanelConfig {
    /// The annotated default config written by `spotpanel config init`.
    pub fn default_toml() -> String {
        r#"# spotpanel Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SPOTPANEL_*)
#   2. Project config (.spotpanel.toml in current directory)
#   3. User global config (~/.spotpanel/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://127.0.0.1:5000"
timeout_ms = 0          # 0 = transport default
session_cookie = ""     # e.g. "session=..." from a logged-in admin browser

[panel]
currency_symbol = "₹"

[web]
addr = "127.0.0.1:9747"

[logging]
enabled = true
path = "~/.spotpanel/events.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
