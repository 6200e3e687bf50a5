//! Backend access for the spot detail panel.
//!
//! [`SpotApi`] is the transport seam: the panel controller only sees a status
//! code and a raw body per request, and decides on its own how to interpret
//! them. [`client::HttpSpotApi`] is the production implementation.

pub mod client;
pub mod models;

use std::sync::Arc;

use anyhow::Result;

pub use client::HttpSpotApi;
pub use models::{CurrentBooking, ErrorBody, FutureBooking, SpotDetailResponse, SpotId};

/// Status line and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two admin endpoints the panel consumes.
///
/// `Err` means the request never produced a response (connection refused,
/// DNS failure, timeout); any status code, including 4xx/5xx, is `Ok`.
pub trait SpotApi: Send + Sync {
    /// `GET /admin/spot-details/{spot_id}`
    fn fetch_details(&self, spot_id: &SpotId) -> Result<HttpReply>;

    /// `POST /admin/delete_spot/{spot_id}`
    fn delete_spot(&self, spot_id: &SpotId) -> Result<HttpReply>;
}

/// One backend shared by several panels (one per open page in the web host).
impl<T: SpotApi + ?Sized> SpotApi for Arc<T> {
    fn fetch_details(&self, spot_id: &SpotId) -> Result<HttpReply> {
        (**self).fetch_details(spot_id)
    }

    fn delete_spot(&self, spot_id: &SpotId) -> Result<HttpReply> {
        (**self).delete_spot(spot_id)
    }
}
