use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::wire::{ExtractionRequest, decode_line_items};
use super::{ExtractionError, RawLineItem, ReceiptExtractor, timeout_millis};
use crate::config::{EXTRACTION_HEADERS_ENV_VAR, ExtractionConfig};
use crate::{ClientError, ClientResult};

/// `ReceiptExtractor` backed by an HTTP document extraction endpoint.
#[derive(Debug, Clone)]
pub struct HttpReceiptExtractor {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
    file_name: String,
}

impl HttpReceiptExtractor {
    pub fn from_config(config: &ExtractionConfig) -> ClientResult<Self> {
        let Some(endpoint) = config.endpoint.clone() else {
            return Err(ClientError::extraction_not_configured());
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ClientError::invalid_config(
                    EXTRACTION_HEADERS_ENV_VAR,
                    &format!("`{name}` is not a valid header name"),
                )
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ClientError::invalid_config(
                    EXTRACTION_HEADERS_ENV_VAR,
                    &format!("value for `{name}` is not a valid header value"),
                )
            })?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| ClientError::internal_runtime(&error.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            headers,
            file_name: config.file_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReceiptExtractor for HttpReceiptExtractor {
    async fn extract(
        &self,
        image: &[u8],
        timeout: Duration,
    ) -> Result<Vec<RawLineItem>, ExtractionError> {
        let timeout_ms = timeout_millis(timeout);
        let body = ExtractionRequest::new(&self.file_name, image);
        let request = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|error| transport_error(&error, timeout_ms))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExtractionError::Api {
                    status: status.as_u16(),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|error| transport_error(&error, timeout_ms))?;
            decode_line_items(&bytes)
        };

        // Dropping `exchange` on expiry abandons the in-flight request.
        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(endpoint = %self.endpoint, timeout_ms, "receipt extraction timed out");
                Err(ExtractionError::Timeout { timeout_ms })
            }
        }
    }
}

fn transport_error(error: &reqwest::Error, timeout_ms: u64) -> ExtractionError {
    if error.is_timeout() {
        return ExtractionError::Timeout { timeout_ms };
    }
    if error.is_decode() {
        return ExtractionError::Decode(error.to_string());
    }
    ExtractionError::Network(error.to_string())
}
