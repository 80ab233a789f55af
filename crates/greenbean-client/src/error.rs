use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `greenbean {cmd} --help` for usage."),
            None => "Run `greenbean --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn image_unreadable(path: &str, detail: &str) -> Self {
        Self::new(
            "image_unreadable",
            &format!("Could not read receipt image `{path}`: {detail}"),
            vec![
                "Check that the path points to a JPEG receipt photo.".to_string(),
                "Retry with `greenbean scan <image-path>`.".to_string(),
            ],
        )
        .with_data(json!({ "path": path }))
    }

    pub fn extraction_not_configured() -> Self {
        Self::new(
            "invalid_config",
            "No receipt extraction endpoint is configured.",
            vec![
                "Set `GREENBEAN_EXTRACTION_URL` to the document extraction endpoint.".to_string(),
                "Or pass `--endpoint <url>` to `greenbean scan`.".to_string(),
            ],
        )
    }

    pub fn invalid_config(key: &str, detail: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("Configuration value `{key}` is invalid: {detail}"),
            vec![format!("Fix or unset `{key}` and retry.")],
        )
        .with_data(json!({ "key": key }))
    }

    pub fn invalid_allow_list(source: &str, detail: &str) -> Self {
        Self::new(
            "invalid_allow_list",
            &format!("Allow-list `{source}` could not be loaded: {detail}"),
            vec![
                "Provide a JSON object mapping product names to true/false.".to_string(),
                "Run `greenbean allow-list show` to confirm the active allow-list.".to_string(),
            ],
        )
        .with_data(json!({ "source": source }))
    }

    pub fn extraction_network(detail: &str) -> Self {
        Self::new(
            "extraction_network_error",
            &format!("Could not reach the receipt extraction service: {detail}"),
            retry_scan_steps(),
        )
    }

    pub fn extraction_timeout(timeout_ms: u64) -> Self {
        Self::new(
            "extraction_timeout",
            &format!("Receipt extraction did not finish within {timeout_ms} ms."),
            vec![
                "Retry the scan; no points were awarded.".to_string(),
                "Raise the limit with `--timeout-ms` if the service is slow.".to_string(),
            ],
        )
        .with_data(json!({ "timeout_ms": timeout_ms }))
    }

    pub fn extraction_api(status_code: u16) -> Self {
        Self::new(
            "extraction_api_error",
            &format!("Receipt extraction service answered with HTTP {status_code}."),
            retry_scan_steps(),
        )
        .with_data(json!({ "status_code": status_code }))
    }

    pub fn extraction_decode(detail: &str) -> Self {
        Self::new(
            "extraction_decode_error",
            &format!("Receipt extraction response was not usable: {detail}"),
            retry_scan_steps(),
        )
    }

    pub fn rewards_persist_failed(detail: &str, store_code: &str) -> Self {
        Self::new(
            "rewards_persist_failed",
            &format!("Reward update could not be saved, so no points were granted: {detail}"),
            vec!["Resolve the storage problem and retry the command.".to_string()],
        )
        .with_data(json!({ "store_code": store_code }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_runtime(message: &str) -> Self {
        Self::new("internal_runtime_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize rewards store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `GREENBEAN_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Rewards store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Rewards store appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid rewards database or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Rewards store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Rewards store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "store_init_permission_denied"
                    | "store_locked"
                    | "store_corrupt"
                    | "migration_failed"
                    | "store_init_failed"
                    | "rewards_persist_failed"
            )
    }
}

fn retry_scan_steps() -> Vec<String> {
    vec![
        "No products were recorded and no points were awarded.".to_string(),
        "Retry with `greenbean scan <image-path>`.".to_string(),
    ]
}

pub type ClientResult<T> = Result<T, ClientError>;
