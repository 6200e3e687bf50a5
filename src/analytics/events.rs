//! Panel event log: one JSONL line per panel operation.
//!
//! Records every `show_details`, `clear_details`, and `delete_spot` call with
//! its outcome, so failed fetches and deletes leave a trace after the panel
//! has been repainted. Read back by `spotpanel log`.
//!
//! Default log file: `~/.spotpanel/events.jsonl`

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{self, schema::LoggingConfig};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// A single panel event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEvent {
    pub timestamp: String,
    /// `"show_details"`, `"clear_details"`, or `"delete_spot"`.
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spot_id: Option<String>,
    /// `"rendered"`, `"superseded"`, `"declined"`, `"deleted"`, `"cleared"`,
    /// or `"failed"`.
    pub outcome: String,
    /// Failure kind (see `PanelError::kind`), only set on failures.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<String>,
    /// User-facing message, only set on failures.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    /// Underlying cause of a failure (transport error, HTTP status, decode
    /// error). Never shown to the user.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    /// Time from intent to outcome, only set for network operations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl PanelEvent {
    /// Start an event stamped with the current time.
    pub fn new(operation: &str, spot_id: Option<&str>, outcome: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation: operation.to_string(),
            spot_id: spot_id.map(|s| s.to_string()),
            outcome: outcome.to_string(),
            error_kind: None,
            message: None,
            detail: None,
            latency_ms: None,
        }
    }

    pub fn with_error(mut self, kind: &str, message: &str) -> Self {
        self.error_kind = Some(kind.to_string());
        self.message = Some(message.to_string());
        self
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// Append-only JSONL sink. A disabled log drops every event.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// A log writing to `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Build the log from the `[logging]` config section.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if config.enabled {
            Self::at(config::expand_home(&config.path))
        } else {
            Self::disabled()
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Best-effort; failures are silently ignored.
    pub fn record(&self, event: &PanelEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &PanelEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        // One write per line so concurrent appenders don't interleave.
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Read every event in the log, skipping malformed lines.
    ///
    /// Returns an empty vec if the log is disabled or missing.
    pub fn read_all(&self) -> Vec<PanelEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<PanelEvent>(&line).ok())
            .collect()
    }

    /// The last `limit` events, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<PanelEvent> {
        let mut events = self.read_all();
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
        events
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> (EventLog, PathBuf) {
        let path = std::env::temp_dir()
            .join(format!("spotpanel-events-{}-{name}", std::process::id()))
            .join("events.jsonl");
        let _ = fs::remove_file(&path);
        (EventLog::at(&path), path)
    }

    #[test]
    fn records_and_reads_back() {
        let (log, path) = temp_log("roundtrip");
        log.record(&PanelEvent::new("show_details", Some("4"), "rendered").with_latency_ms(12));
        log.record(
            &PanelEvent::new("delete_spot", Some("4"), "failed")
                .with_error("delete", "Spot not found")
                .with_detail("HTTP 404"),
        );

        let events = log.read_all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].latency_ms, Some(12));
        assert_eq!(events[1].error_kind.as_deref(), Some("delete"));
        assert_eq!(events[1].message.as_deref(), Some("Spot not found"));
        assert_eq!(events[1].detail.as_deref(), Some("HTTP 404"));
        assert_eq!(events[0].detail, None);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn skips_malformed_lines() {
        let (log, path) = temp_log("malformed");
        log.record(&PanelEvent::new("clear_details", None, "cleared"));
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "not json").unwrap();
        }
        log.record(&PanelEvent::new("clear_details", None, "cleared"));

        assert_eq!(log.read_all().len(), 2);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_recent_keeps_the_tail() {
        let (log, path) = temp_log("recent");
        for id in ["1", "2", "3"] {
            log.record(&PanelEvent::new("show_details", Some(id), "rendered"));
        }

        let recent = log.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].spot_id.as_deref(), Some("2"));
        assert_eq!(recent[1].spot_id.as_deref(), Some("3"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn disabled_log_is_silent() {
        let log = EventLog::disabled();
        log.record(&PanelEvent::new("show_details", Some("1"), "rendered"));
        assert!(log.read_all().is_empty());
        assert!(log.path().is_none());
    }

    #[test]
    fn from_config_respects_switch() {
        let mut config = LoggingConfig::default();
        assert!(EventLog::from_config(&config).path().is_some());
        config.enabled = false;
        assert!(EventLog::from_config(&config).path().is_none());
    }
}
