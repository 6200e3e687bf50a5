//! JSON API handlers for the embedded panel host.
//!
//! The browser owns confirmation and reload; these handlers run the intent
//! against the requesting page's panel and report back what the page should
//! do.

use std::cell::{Cell, RefCell};
use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use super::content_type_json;
use super::pages::{DEFAULT_PAGE, Pages};
use crate::api::SpotApi;
use crate::dispatch::{Dispatcher, Intent, IntentOutcome};
use crate::panel::{PageHost, ShowOutcome};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/intent`.
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    /// Page the intent came from; intents without one share the default
    /// page.
    #[serde(default)]
    pub page_id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub spot_id: Option<String>,
    /// The browser's answer to the delete confirmation.
    #[serde(default)]
    pub confirmed: bool,
}

/// Reply to `POST /api/intent`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IntentResponse {
    /// Panel markup after the intent ran.
    pub panel: String,
    /// A newer intent overtook this one; the page must not repaint.
    pub stale: bool,
    /// Messages the page shows as blocking notifications.
    pub notifications: Vec<String>,
    /// The page must reload itself.
    pub reload: bool,
    pub outcome: String,
}

/// Reply to `GET /api/panel`.
#[derive(Debug, Serialize)]
struct PanelResponse {
    panel: String,
}

// ---------------------------------------------------------------------------
// Page host backed by the HTTP exchange
// ---------------------------------------------------------------------------

/// Collects what the browser has to do once the response arrives.
struct BrowserHost {
    confirmed: bool,
    notifications: RefCell<Vec<String>>,
    reload: Cell<bool>,
}

impl BrowserHost {
    fn new(confirmed: bool) -> Self {
        Self {
            confirmed,
            notifications: RefCell::new(Vec::new()),
            reload: Cell::new(false),
        }
    }
}

impl PageHost for BrowserHost {
    fn confirm(&self, _message: &str) -> bool {
        self.confirmed
    }

    fn notify(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }

    fn reload(&self) {
        self.reload.set(true);
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Run one intent against the panel of the page that sent it.
///
/// Fails only when the request itself is malformed; panel failures are part
/// of a successful response.
pub fn handle_intent<A: SpotApi>(pages: &Pages<A>, body: &str) -> Result<IntentResponse> {
    let request: IntentRequest =
        serde_json::from_str(body).context("malformed intent request")?;
    let intent = Intent::from_action(&request.action, request.spot_id.as_deref())?;
    let panel = pages.page(request.page_id.as_deref().unwrap_or(DEFAULT_PAGE))?;

    let host = BrowserHost::new(request.confirmed);
    let outcome = Dispatcher::bind(&*panel, &host).dispatch(&intent);

    let (stale, label) = match &outcome {
        IntentOutcome::Shown(ShowOutcome::Superseded) => (true, "superseded"),
        IntentOutcome::Shown(shown) => (false, shown.label()),
        IntentOutcome::Cleared => (false, "cleared"),
        IntentOutcome::Deleted(deleted) => (false, deleted.label()),
    };

    Ok(IntentResponse {
        panel: panel.markup(),
        stale,
        notifications: host.notifications.into_inner(),
        reload: host.reload.get(),
        outcome: label.to_string(),
    })
}

/// `POST /api/intent`
pub fn post_intent<A: SpotApi>(pages: &Pages<A>, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    match handle_intent(pages, body) {
        Ok(resp) => json_response(&resp),
        Err(e) => Ok(error_response(400, &format!("{e:#}"))),
    }
}

/// `GET /api/panel?page=<id>`
pub fn get_panel<A: SpotApi>(
    pages: &Pages<A>,
    page_id: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    match pages.page(page_id.unwrap_or(DEFAULT_PAGE)) {
        Ok(panel) => json_response(&PanelResponse {
            panel: panel.markup(),
        }),
        Err(e) => Ok(error_response(400, &format!("{e:#}"))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Build a JSON `{"error": ...}` response with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
