//! Intent dispatch for panel controls.
//!
//! Rendered controls carry `data-action` / `data-spot-id` attributes instead
//! of calling page-global functions. A trigger is parsed into a typed
//! [`Intent`] and routed by a [`Dispatcher`] that was bound to one panel and
//! one page host when the page was set up.

use std::fmt;

use anyhow::{Context, Result};

use crate::api::{SpotApi, SpotId};
use crate::panel::{DeleteOutcome, PageHost, ShowOutcome, SpotDetailPanel};

/// `data-action` value of a show trigger.
pub const ACTION_SHOW: &str = "show-details";
/// `data-action` value of the close control.
pub const ACTION_CLEAR: &str = "clear-details";
/// `data-action` value of the delete control.
pub const ACTION_DELETE: &str = "delete-spot";

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// A user intent raised by a panel control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowDetails(SpotId),
    ClearDetails,
    DeleteSpot(SpotId),
}

impl Intent {
    /// Parse a trigger's `data-action` and optional `data-spot-id`.
    pub fn from_action(action: &str, spot_id: Option<&str>) -> Result<Self> {
        let spot = |action: &str| -> Result<SpotId> {
            let raw = spot_id.with_context(|| format!("'{action}' requires a spot id"))?;
            SpotId::parse(raw)
        };

        match action {
            ACTION_SHOW => Ok(Self::ShowDetails(spot(action)?)),
            ACTION_CLEAR => Ok(Self::ClearDetails),
            ACTION_DELETE => Ok(Self::DeleteSpot(spot(action)?)),
            other => anyhow::bail!("unknown panel action: {other:?}"),
        }
    }

    /// The `data-action` value that raises this intent.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ShowDetails(_) => ACTION_SHOW,
            Self::ClearDetails => ACTION_CLEAR,
            Self::DeleteSpot(_) => ACTION_DELETE,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowDetails(id) | Self::DeleteSpot(id) => write!(f, "{} {}", self.action(), id),
            Self::ClearDetails => f.write_str(self.action()),
        }
    }
}

/// What handling an intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Shown(ShowOutcome),
    Cleared,
    Deleted(DeleteOutcome),
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes intents to a panel, with page capabilities bound up front.
pub struct Dispatcher<'a, A> {
    panel: &'a SpotDetailPanel<A>,
    host: &'a dyn PageHost,
}

impl<'a, A: SpotApi> Dispatcher<'a, A> {
    pub fn bind(panel: &'a SpotDetailPanel<A>, host: &'a dyn PageHost) -> Self {
        Self { panel, host }
    }

    pub fn dispatch(&self, intent: &Intent) -> IntentOutcome {
        match intent {
            Intent::ShowDetails(id) => IntentOutcome::Shown(self.panel.show_details(id)),
            Intent::ClearDetails => {
                self.panel.clear_details();
                IntentOutcome::Cleared
            }
            Intent::DeleteSpot(id) => IntentOutcome::Deleted(self.panel.delete_spot(id, self.host)),
        }
    }

    /// Parse a raw trigger and dispatch it.
    pub fn trigger(&self, action: &str, spot_id: Option<&str>) -> Result<IntentOutcome> {
        let intent = Intent::from_action(action, spot_id)?;
        Ok(self.dispatch(&intent))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
