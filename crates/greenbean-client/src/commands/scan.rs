use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::commands::common::{load_allow_list, load_setup, open_engine};
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{RewardsView, ScanData};
use crate::extraction::HttpReceiptExtractor;
use crate::scan::{ScanRequest, scan};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ScanRunOptions<'a> {
    pub image_path: String,
    pub event: Option<String>,
    pub timeout_ms: Option<u64>,
    pub dry_run: bool,
    pub endpoint_override: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(
    image_path: String,
    event: Option<String>,
    timeout_ms: Option<u64>,
    dry_run: bool,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(ScanRunOptions {
        image_path,
        event,
        timeout_ms,
        dry_run,
        endpoint_override: None,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ScanRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let mut config = AppConfig::load(Some(&setup.home))?;
    if let Some(endpoint) = options.endpoint_override.clone() {
        config.extraction.endpoint = Some(endpoint);
    }
    if let Some(timeout_ms) = options.timeout_ms {
        config.extraction.timeout_ms = timeout_ms;
    }

    let image = fs::read(&options.image_path)
        .map_err(|error| ClientError::image_unreadable(&options.image_path, &error.to_string()))?;
    let allow_list = load_allow_list(&config)?;
    let extractor = HttpReceiptExtractor::from_config(&config.extraction)?;
    let engine = open_engine(&setup)?;

    let request = ScanRequest {
        image,
        event: options.event.clone(),
        timeout: Duration::from_millis(config.extraction.timeout_ms),
        dry_run: options.dry_run,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| ClientError::internal_runtime(&error.to_string()))?;
    let outcome = runtime.block_on(scan(&extractor, &engine, &allow_list, request))?;

    let message = if outcome.items.is_empty() {
        "No products found on this receipt. No points were awarded.".to_string()
    } else if options.dry_run {
        "Dry run: products classified, rewards not updated.".to_string()
    } else {
        format!("Receipt scanned. You earned {} points.", outcome.points_awarded)
    };

    let data = ScanData {
        scan_id: outcome.scan_id,
        image_path: options.image_path,
        dry_run: options.dry_run,
        message,
        items: outcome.items,
        sustainable_subtotal: outcome.sustainable_subtotal,
        dropped_items: outcome.dropped_items,
        points_awarded: outcome.points_awarded,
        rewards: outcome.rewards.as_ref().map(RewardsView::from),
    };

    success("scan", data)
}
