//! Markup for the details panel.
//!
//! Dynamic fragments are askama templates under `templates/panel/`; askama
//! HTML-escapes every interpolated value, so server-supplied text can never
//! inject markup. Static fragments are plain constants.

use anyhow::{Context, Result};
use askama::Template;

use crate::api::models::{CurrentBooking, SpotDetailResponse, SpotId};

/// Initial content of the details region, restored by `clear_details`.
pub const PLACEHOLDER_HTML: &str =
    r#"<p class="text-center text-muted mt-5">Click a parking spot to view details here.</p>"#;

/// Written synchronously before a details request goes out.
pub const LOADING_HTML: &str = r#"<div class="text-center py-4"><div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading...</span></div><p class="mt-2 text-muted">Loading details...</p></div>"#;

/// Last-resort alert if the error template itself cannot be rendered.
const FALLBACK_ERROR_HTML: &str =
    r#"<div class="alert alert-danger">Error: Could not load details.</div>"#;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Top banner of the details view.
enum StatusBanner<'a> {
    Occupied(&'a CurrentBooking),
    MarkedOccupied,
    Available,
    AvailableBookedAhead,
}

/// A `"date time"` string split for two-line display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCell<'a> {
    pub date: &'a str,
    pub time: &'a str,
}

impl<'a> TimeCell<'a> {
    /// Split on the first space. The value is opaque display text: no
    /// timestamp parsing, and a value without a space keeps everything on
    /// the date line.
    pub fn split(raw: &'a str) -> Self {
        match raw.split_once(' ') {
            Some((date, time)) => Self { date, time },
            None => Self { date: raw, time: "" },
        }
    }
}

struct UpcomingRow<'a> {
    user_name: &'a str,
    vehicle_no: &'a str,
    from: TimeCell<'a>,
    until: TimeCell<'a>,
}

#[derive(Template)]
#[template(path = "panel/details.html")]
struct DetailsTemplate<'a> {
    spot_id: &'a SpotId,
    status: StatusBanner<'a>,
    currency: &'a str,
    upcoming: Vec<UpcomingRow<'a>>,
    show_no_upcoming: bool,
    is_deletable: bool,
}

#[derive(Template)]
#[template(path = "panel/error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full details view for one spot-details response.
pub fn render_details(spot_id: &SpotId, details: &SpotDetailResponse, currency: &str) -> Result<String> {
    let status = match (&details.current_booking_details, details.current_occupied) {
        (Some(booking), true) => StatusBanner::Occupied(booking),
        _ if details.is_marked_occupied() && !details.current_occupied => StatusBanner::MarkedOccupied,
        _ if details.future_bookings_details.is_empty() => StatusBanner::Available,
        _ => StatusBanner::AvailableBookedAhead,
    };

    let upcoming = details
        .future_bookings_details
        .iter()
        .map(|fb| UpcomingRow {
            user_name: &fb.user_name,
            vehicle_no: &fb.vehicle_no,
            from: TimeCell::split(&fb.parking_time),
            until: TimeCell::split(&fb.leaving_time),
        })
        .collect();

    DetailsTemplate {
        spot_id,
        status,
        currency,
        upcoming,
        show_no_upcoming: !details.current_occupied,
        is_deletable: details.is_deletable,
    }
    .render()
    .context("failed to render spot details")
}

/// Render the inline error alert shown in place of the details.
pub fn render_error(message: &str) -> String {
    ErrorTemplate { message }
        .render()
        .unwrap_or_else(|_| FALLBACK_ERROR_HTML.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
