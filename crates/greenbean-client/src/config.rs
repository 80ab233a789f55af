use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::{allow_list_path, resolve_home};
use crate::{ClientError, ClientResult};

pub const EXTRACTION_URL_ENV_VAR: &str = "GREENBEAN_EXTRACTION_URL";
pub const EXTRACTION_HEADERS_ENV_VAR: &str = "GREENBEAN_EXTRACTION_HEADERS";
pub const EXTRACTION_TIMEOUT_ENV_VAR: &str = "GREENBEAN_EXTRACTION_TIMEOUT_MS";
pub const ALLOW_LIST_ENV_VAR: &str = "GREENBEAN_ALLOW_LIST";

pub const DEFAULT_EXTRACTION_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RECEIPT_FILE_NAME: &str = "receipt.jpg";

/// Everything the scan pipeline needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub home: PathBuf,
    pub extraction: ExtractionConfig,
    pub allow_list: AllowListSource,
}

/// Settings for the outbound document extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub endpoint: Option<String>,
    pub headers: Vec<(String, String)>,
    pub timeout_ms: u64,
    pub file_name: String,
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Where the sustainable-product allow-list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowListSource {
    Bundled,
    File(PathBuf),
}

impl AllowListSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads process environment variables.
    pub fn load(home_override: Option<&Path>) -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        let home = resolve_home(home_override)?;
        Self::from_lookup(home, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(home: PathBuf, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(EXTRACTION_URL_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(url) = &endpoint
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ClientError::invalid_config(
                EXTRACTION_URL_ENV_VAR,
                "endpoint must start with http:// or https://",
            ));
        }

        let headers = match lookup(EXTRACTION_HEADERS_ENV_VAR) {
            Some(raw) => parse_header_list(&raw)?,
            None => Vec::new(),
        };

        let timeout_ms = match lookup(EXTRACTION_TIMEOUT_ENV_VAR) {
            Some(raw) => parse_timeout_ms(&raw)
                .map_err(|detail| ClientError::invalid_config(EXTRACTION_TIMEOUT_ENV_VAR, &detail))?,
            None => DEFAULT_EXTRACTION_TIMEOUT_MS,
        };

        let allow_list = match lookup(ALLOW_LIST_ENV_VAR).filter(|value| !value.trim().is_empty())
        {
            Some(path) => AllowListSource::File(PathBuf::from(path.trim())),
            None => {
                let home_file = allow_list_path(&home);
                if home_file.is_file() {
                    AllowListSource::File(home_file)
                } else {
                    AllowListSource::Bundled
                }
            }
        };

        Ok(Self {
            home,
            extraction: ExtractionConfig {
                endpoint,
                headers,
                timeout_ms,
                file_name: DEFAULT_RECEIPT_FILE_NAME.to_string(),
            },
            allow_list,
        })
    }
}

pub fn parse_timeout_ms(raw: &str) -> Result<u64, String> {
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| "timeout must be a whole number of milliseconds".to_string())?;
    if value == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(value)
}

/// Parses `Name: value;Other-Name: value` into header pairs.
fn parse_header_list(raw: &str) -> ClientResult<Vec<(String, String)>> {
    let mut headers = Vec::new();
    for entry in raw.split(';') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((name, value)) = trimmed.split_once(':') else {
            return Err(ClientError::invalid_config(
                EXTRACTION_HEADERS_ENV_VAR,
                &format!("entry `{trimmed}` must look like `Name: value`"),
            ));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::invalid_config(
                EXTRACTION_HEADERS_ENV_VAR,
                "header names must not be empty",
            ));
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }
    Ok(headers)
}
