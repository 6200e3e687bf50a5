//! User-visible failure taxonomy of the spot detail panel.

use std::fmt;

/// Fallback when a details error body carries no usable message.
pub const DEFAULT_FETCH_MESSAGE: &str = "Failed to fetch details";
/// Fallback when the details request fails outright or the body is malformed.
pub const DEFAULT_LOAD_MESSAGE: &str = "Could not load details.";
/// Delete failed and the JSON body had no `error` field.
pub const DEFAULT_DELETE_MESSAGE: &str = "Failed to delete spot.";
/// Delete failed and the body was not JSON.
pub const DELETE_SERVER_ERROR_MESSAGE: &str = "Failed to delete spot. Server error.";
/// Delete request never completed.
pub const DELETE_NETWORK_MESSAGE: &str = "An error occurred while trying to delete the spot.";

/// Every failure the panel can surface. Each variant carries the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// Details endpoint answered with a non-2xx status.
    DetailsFetch(String),
    /// Details body was not valid, or the request never completed.
    DetailsParse(String),
    /// Delete endpoint answered with a non-2xx status.
    Delete(String),
    /// Delete request never completed.
    DeleteNetwork(String),
}

impl PanelError {
    /// The message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            Self::DetailsFetch(m) | Self::DetailsParse(m) | Self::Delete(m) | Self::DeleteNetwork(m) => m,
        }
    }

    /// Short machine-readable kind, used in the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DetailsFetch(_) => "details_fetch",
            Self::DetailsParse(_) => "details_parse",
            Self::Delete(_) => "delete",
            Self::DeleteNetwork(_) => "delete_network",
        }
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PanelError {}
