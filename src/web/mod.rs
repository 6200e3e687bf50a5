//! Embedded web host for the spot detail panel.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The admin shell page with the `details-content` region
//! - JSON endpoints that run panel intents and report the resulting markup
//!
//! Each served page gets its own panel (see [`Pages`]); the page id travels
//! with every intent.
//!
//! Launched via `spotpanel serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;
mod pages;

pub use api::{IntentRequest, IntentResponse, handle_intent};
pub use pages::{DEFAULT_PAGE, MAX_PAGES, PagePanel, Pages};

use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::api::SpotApi;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the panel host on the given address.
///
/// Blocks the current thread. Each request is handled on its own thread, so
/// overlapping intents from one page race the way clicks do in a browser;
/// that page's request sequencing decides which one paints.
pub fn serve<A: SpotApi + 'static>(addr: &str, pages: Arc<Pages<A>>) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("spotpanel running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    for request in server.incoming_requests() {
        let pages = Arc::clone(&pages);
        thread::spawn(move || handle(request, &pages));
    }

    Ok(())
}

/// Read, route, and answer one request.
fn handle<A: SpotApi>(mut request: Request, pages: &Pages<A>) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let body = if matches!(method, Method::Post) {
        let mut buf = String::new();
        let _ = request.as_reader().read_to_string(&mut buf);
        Some(buf)
    } else {
        None
    };

    let response = match route(pages, &method, &url, body.as_deref()) {
        Ok(resp) => resp,
        Err(e) => api::error_response(500, &e.to_string()),
    };
    let status = response.status_code().0;
    let _ = request.respond(response);

    // Brief access log
    println!(
        "{} {} {} {}",
        method,
        url,
        status,
        chrono::Local::now().format("%H:%M:%S")
    );
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn route<A: SpotApi>(
    pages: &Pages<A>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend(pages)),
        (&Method::Get, "/api/panel") => api::get_panel(pages, query_param(query, "page")),
        (&Method::Post, "/api/intent") => api::post_intent(pages, body.unwrap_or("")),
        _ => Ok(api::error_response(404, "not found")),
    }
}

/// Value of `key` in a raw query string. Page ids need no decoding.
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the shell page for a freshly opened page.
fn serve_frontend<A: SpotApi>(pages: &Pages<A>) -> Response<Cursor<Vec<u8>>> {
    let (page_id, panel) = pages.open();
    let html = frontend::index_html(&page_id, &panel.markup());
    Response::from_data(html.into_bytes())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
