//! Admin spot detail panel for a parking-spot management backend.
//!
//! The [`panel::SpotDetailPanel`] controller fetches spot details over the
//! [`api::SpotApi`] seam, renders them into the details region, and deletes
//! spots after confirmation. The CLI ([`cli`]) and the embedded web host
//! ([`web`]) both drive it through [`dispatch`] or directly.

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod panel;
pub mod web;
