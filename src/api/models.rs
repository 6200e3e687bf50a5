//! Wire types for the parking backend's admin endpoints.

use std::fmt;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Characters allowed in a spot id: it is placed verbatim in a URL path
/// segment and in a `data-spot-id` attribute.
static SPOT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("spot id regex must compile"));

// ---------------------------------------------------------------------------
// Spot identifier
// ---------------------------------------------------------------------------

/// Opaque spot identifier supplied by the page (usually the numeric spot id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    /// Parse a spot id token, rejecting anything that is not URL-path safe.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if !SPOT_ID_RE.is_match(raw) {
            anyhow::bail!("invalid spot id: {raw:?}");
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SpotId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// GET /admin/spot-details/{id}
// ---------------------------------------------------------------------------

/// Spot status code marking a spot administratively occupied.
pub const STATUS_OCCUPIED: &str = "O";

/// Body of a successful spot-details response.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotDetailResponse {
    pub current_occupied: bool,
    #[serde(default)]
    pub current_booking_details: Option<CurrentBooking>,
    pub spot_status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub future_bookings_details: Vec<FutureBooking>,
    pub is_deletable: bool,
}

impl SpotDetailResponse {
    /// True when the spot carries the administrative occupied status code.
    pub fn is_marked_occupied(&self) -> bool {
        self.spot_status == STATUS_OCCUPIED
    }
}

/// The booking currently holding the spot.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBooking {
    pub user_name: String,
    pub email: String,
    pub vehicle_no: String,
    pub parking_time: String,
    pub leaving_time: String,
    /// Sent as a string by the backend; numbers are accepted too.
    #[serde(deserialize_with = "display_text")]
    pub parking_cost: String,
}

/// A booking that starts in the future.
#[derive(Debug, Clone, Deserialize)]
pub struct FutureBooking {
    pub user_name: String,
    pub vehicle_no: String,
    pub parking_time: String,
    pub leaving_time: String,
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------

/// `{"error": "..."}` body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body. `None` when the body is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The non-empty `error` message, if any.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn display_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
