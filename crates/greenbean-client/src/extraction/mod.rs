//! Receipt extraction: ships a receipt photo to a document extraction service
//! and hands back the raw line items it found.

mod http;
pub(crate) mod wire;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::ClientError;

pub use http::HttpReceiptExtractor;
pub use wire::decode_line_items;

/// One line item as reported by the extraction service. Either field may be
/// missing; the classifier decides what to keep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawLineItem {
    pub description: Option<String>,
    pub total: Option<f64>,
}

impl RawLineItem {
    pub fn new(description: &str, total: f64) -> Self {
        Self {
            description: Some(description.to_string()),
            total: Some(total),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("could not reach the extraction service: {0}")]
    Network(String),
    #[error("extraction service did not respond within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("extraction service returned HTTP {status}")]
    Api { status: u16 },
    #[error("extraction response could not be decoded: {0}")]
    Decode(String),
}

impl From<ExtractionError> for ClientError {
    fn from(value: ExtractionError) -> Self {
        match value {
            ExtractionError::Network(detail) => ClientError::extraction_network(&detail),
            ExtractionError::Timeout { timeout_ms } => ClientError::extraction_timeout(timeout_ms),
            ExtractionError::Api { status } => ClientError::extraction_api(status),
            ExtractionError::Decode(detail) => ClientError::extraction_decode(&detail),
        }
    }
}

#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    /// Returns the line items found on `image`. Implementations must give up
    /// once `timeout` has elapsed.
    async fn extract(
        &self,
        image: &[u8],
        timeout: Duration,
    ) -> Result<Vec<RawLineItem>, ExtractionError>;
}

pub(crate) fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
