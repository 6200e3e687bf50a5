//! Spot detail panel controller.
//!
//! [`SpotDetailPanel`] owns the details region of the admin page and exposes
//! the three user operations:
//!
//! - [`show_details`](SpotDetailPanel::show_details) — loading indicator,
//!   one GET, then the rendered details or an inline error alert
//! - [`clear_details`](SpotDetailPanel::clear_details) — back to the
//!   placeholder prompt
//! - [`delete_spot`](SpotDetailPanel::delete_spot) — confirm, one POST, then
//!   reload or a blocking notification
//!
//! Every failure is converted to user-visible feedback here; nothing
//! propagates to the caller and nothing is retried.
//!
//! Overlapping `show_details` calls are sequenced: each intent takes a
//! ticket, and a fetch result is only painted if no newer intent (show or
//! clear) was issued while it was in flight.

pub mod error;
pub mod render;
pub mod sequence;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::analytics::{EventLog, PanelEvent};
use crate::api::{ErrorBody, HttpSpotApi, SpotApi, SpotDetailResponse, SpotId};
use crate::config::PanelConfig;
use crate::config::schema::PanelSettings;

pub use error::PanelError;
use error::{
    DEFAULT_DELETE_MESSAGE, DEFAULT_FETCH_MESSAGE, DEFAULT_LOAD_MESSAGE, DELETE_NETWORK_MESSAGE,
    DELETE_SERVER_ERROR_MESSAGE,
};
pub use render::{LOADING_HTML, PLACEHOLDER_HTML};
use sequence::{RequestSequence, Ticket};

/// Prompt shown before a spot is deleted.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this spot?";

// ---------------------------------------------------------------------------
// Page host
// ---------------------------------------------------------------------------

/// Page-level capabilities the panel needs beyond its own region.
pub trait PageHost {
    /// Ask the user a yes/no question. Blocks until answered.
    fn confirm(&self, message: &str) -> bool;

    /// Show a blocking notification.
    fn notify(&self, message: &str);

    /// Reload the whole page (refreshes the spot list after a delete).
    fn reload(&self);
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// The `details-content` region. Starts with the placeholder prompt.
#[derive(Debug)]
pub struct PanelRegion {
    markup: Mutex<String>,
}

impl Default for PanelRegion {
    fn default() -> Self {
        Self {
            markup: Mutex::new(PLACEHOLDER_HTML.to_string()),
        }
    }
}

impl PanelRegion {
    /// Current markup of the region.
    pub fn snapshot(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        // The guarded value is a plain string; a panicked writer cannot leave
        // it half-updated.
        self.markup.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one `show_details` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Details were painted into the region.
    Rendered,
    /// An error alert was painted into the region.
    Failed(PanelError),
    /// A newer intent was issued while this fetch was in flight; nothing was
    /// painted.
    Superseded,
}

impl ShowOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rendered => "rendered",
            Self::Failed(_) => "failed",
            Self::Superseded => "superseded",
        }
    }
}

/// Result of one `delete_spot` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; no request was sent.
    Declined,
    /// The spot was deleted and a reload was requested.
    Deleted,
    /// The user was notified of the failure.
    Failed(PanelError),
}

impl DeleteOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Declined => "declined",
            Self::Deleted => "deleted",
            Self::Failed(_) => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Controller for one details panel.
pub struct SpotDetailPanel<A> {
    api: A,
    region: PanelRegion,
    sequence: RequestSequence,
    currency: String,
    events: EventLog,
}

impl SpotDetailPanel<HttpSpotApi> {
    /// Panel talking to the configured backend, logging per `[logging]`.
    pub fn from_config(config: &PanelConfig) -> Self {
        SpotDetailPanel::new(HttpSpotApi::from_config(&config.api), &config.panel)
            .with_event_log(EventLog::from_config(&config.logging))
    }
}

impl<A: SpotApi> SpotDetailPanel<A> {
    pub fn new(api: A, settings: &PanelSettings) -> Self {
        Self {
            api,
            region: PanelRegion::default(),
            sequence: RequestSequence::new(),
            currency: settings.currency_symbol.clone(),
            events: EventLog::disabled(),
        }
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current markup of the details region.
    pub fn markup(&self) -> String {
        self.region.snapshot()
    }

    /// Fetch and display the details of `spot_id`.
    ///
    /// The loading indicator is in place before the request is issued.
    pub fn show_details(&self, spot_id: &SpotId) -> ShowOutcome {
        let started = Instant::now();
        let ticket = self.paint_now(LOADING_HTML);

        let (outcome, cause) = match self.load_details(spot_id) {
            Ok(html) => {
                let outcome = if self.paint_if_latest(ticket, html) {
                    ShowOutcome::Rendered
                } else {
                    ShowOutcome::Superseded
                };
                (outcome, None)
            }
            Err(failure) => {
                let alert = render::render_error(failure.error.message());
                let outcome = if self.paint_if_latest(ticket, alert) {
                    ShowOutcome::Failed(failure.error)
                } else {
                    ShowOutcome::Superseded
                };
                (outcome, failure.cause)
            }
        };

        let mut event = PanelEvent::new("show_details", Some(spot_id.as_str()), outcome.label())
            .with_latency_ms(elapsed_ms(started));
        if let ShowOutcome::Failed(err) = &outcome {
            event = event.with_error(err.kind(), err.message());
        }
        if let Some(cause) = &cause {
            event = event.with_detail(cause);
        }
        self.events.record(&event);

        outcome
    }

    /// Reset the region to the placeholder prompt. Idempotent.
    ///
    /// Also supersedes any `show_details` still in flight.
    pub fn clear_details(&self) {
        self.paint_now(PLACEHOLDER_HTML);
        self.events
            .record(&PanelEvent::new("clear_details", None, "cleared"));
    }

    /// Delete `spot_id` after the user confirms.
    ///
    /// Success reloads the page through `host`; failures are reported with
    /// `host.notify`. Declining sends nothing.
    pub fn delete_spot(&self, spot_id: &SpotId, host: &dyn PageHost) -> DeleteOutcome {
        if !host.confirm(DELETE_CONFIRMATION) {
            let outcome = DeleteOutcome::Declined;
            self.events.record(&PanelEvent::new(
                "delete_spot",
                Some(spot_id.as_str()),
                outcome.label(),
            ));
            return outcome;
        }

        let started = Instant::now();
        let (outcome, cause) = match self.api.delete_spot(spot_id) {
            Ok(reply) if reply.is_success() => {
                host.reload();
                (DeleteOutcome::Deleted, None)
            }
            Ok(reply) => {
                let message = match ErrorBody::parse(&reply.body) {
                    Some(body) => body.message().unwrap_or(DEFAULT_DELETE_MESSAGE).to_string(),
                    None => DELETE_SERVER_ERROR_MESSAGE.to_string(),
                };
                host.notify(&message);
                (
                    DeleteOutcome::Failed(PanelError::Delete(message)),
                    Some(status_detail(reply.status)),
                )
            }
            Err(e) => {
                host.notify(DELETE_NETWORK_MESSAGE);
                (
                    DeleteOutcome::Failed(PanelError::DeleteNetwork(DELETE_NETWORK_MESSAGE.to_string())),
                    Some(format!("{e:#}")),
                )
            }
        };

        let mut event = PanelEvent::new("delete_spot", Some(spot_id.as_str()), outcome.label())
            .with_latency_ms(elapsed_ms(started));
        if let DeleteOutcome::Failed(err) = &outcome {
            event = event.with_error(err.kind(), err.message());
        }
        if let Some(cause) = &cause {
            event = event.with_detail(cause);
        }
        self.events.record(&event);

        outcome
    }

    /// Request the details and turn them into markup.
    fn load_details(&self, spot_id: &SpotId) -> Result<String, LoadFailure> {
        let reply = self
            .api
            .fetch_details(spot_id)
            .map_err(|e| LoadFailure::generic(format!("{e:#}")))?;

        if !reply.is_success() {
            let message = ErrorBody::parse(&reply.body)
                .and_then(|body| body.message().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_FETCH_MESSAGE.to_string());
            return Err(LoadFailure {
                error: PanelError::DetailsFetch(message),
                cause: Some(status_detail(reply.status)),
            });
        }

        let details: SpotDetailResponse = serde_json::from_str(&reply.body)
            .map_err(|e| LoadFailure::generic(format!("invalid details body: {e}")))?;

        render::render_details(spot_id, &details, &self.currency)
            .map_err(|e| LoadFailure::generic(format!("{e:#}")))
    }

    /// Paint unconditionally and issue a new ticket in the same critical
    /// section, superseding every earlier intent.
    fn paint_now(&self, markup: &str) -> Ticket {
        let mut region = self.region.lock();
        *region = markup.to_string();
        self.sequence.issue()
    }

    /// Paint only if `ticket` is still the newest intent.
    fn paint_if_latest(&self, ticket: Ticket, markup: String) -> bool {
        let mut region = self.region.lock();
        if !self.sequence.is_latest(ticket) {
            return false;
        }
        *region = markup;
        true
    }
}

/// A details failure together with its cause for the event log.
struct LoadFailure {
    error: PanelError,
    cause: Option<String>,
}

impl LoadFailure {
    /// The generic "could not load" failure, keeping `cause` for the log.
    fn generic(cause: String) -> Self {
        Self {
            error: PanelError::DetailsParse(DEFAULT_LOAD_MESSAGE.to_string()),
            cause: Some(cause),
        }
    }
}

fn status_detail(status: u16) -> String {
    format!("HTTP {status}")
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
