//! One receipt scan: extract, classify, then score.

use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;
use ulid::Ulid;

use crate::classify::{AllowList, Classification, ValidatedPurchase, classify};
use crate::extraction::{ReceiptExtractor, timeout_millis};
use crate::rewards::{RewardsEngine, RewardsState, RewardsStore};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub image: Vec<u8>,
    pub event: Option<String>,
    pub timeout: Duration,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub scan_id: String,
    pub items: Vec<ValidatedPurchase>,
    pub sustainable_subtotal: f64,
    pub dropped_items: usize,
    pub points_awarded: i64,
    pub rewards: Option<RewardsState>,
}

/// Runs a full scan session.
///
/// Scoring only happens after extraction has completed and at least one
/// usable item was found, and there is no await point between classifying and
/// scoring. Dropping the returned future before extraction finishes therefore
/// never touches the rewards state.
pub async fn scan<E, S>(
    extractor: &E,
    engine: &RewardsEngine<S>,
    allow_list: &AllowList,
    request: ScanRequest,
) -> ClientResult<ScanOutcome>
where
    E: ReceiptExtractor + ?Sized,
    S: RewardsStore,
{
    validate_request(&request)?;

    let scan_id = format!("scan_{}", Ulid::new());
    let span = tracing::info_span!("scan", scan_id = %scan_id);

    let raw_items = extractor
        .extract(&request.image, request.timeout)
        .instrument(span.clone())
        .await
        .map_err(|error| {
            let _entered = span.enter();
            tracing::warn!(%error, "receipt extraction failed; rewards untouched");
            ClientError::from(error)
        })?;

    let _entered = span.enter();
    let classification = classify(&raw_items, allow_list);
    score(scan_id, classification, engine, &request)
}

fn validate_request(request: &ScanRequest) -> ClientResult<()> {
    if request.image.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Receipt image is empty.",
            Some("scan"),
        ));
    }
    if timeout_millis(request.timeout) == 0 {
        return Err(ClientError::invalid_argument_for_command(
            "Extraction timeout must be greater than zero milliseconds.",
            Some("scan"),
        ));
    }
    Ok(())
}

fn score<S: RewardsStore>(
    scan_id: String,
    classification: Classification,
    engine: &RewardsEngine<S>,
    request: &ScanRequest,
) -> ClientResult<ScanOutcome> {
    let Classification {
        items,
        sustainable_subtotal,
        dropped,
    } = classification;

    if items.is_empty() {
        tracing::info!(dropped, "no products found on receipt");
        return Ok(ScanOutcome {
            scan_id,
            items,
            sustainable_subtotal,
            dropped_items: dropped,
            points_awarded: 0,
            rewards: None,
        });
    }

    if request.dry_run {
        tracing::info!(
            items = items.len(),
            sustainable_subtotal,
            "dry run; rewards not updated"
        );
        return Ok(ScanOutcome {
            scan_id,
            items,
            sustainable_subtotal,
            dropped_items: dropped,
            points_awarded: 0,
            rewards: None,
        });
    }

    let outcome = engine.award_purchase(sustainable_subtotal, request.event.as_deref())?;
    tracing::info!(
        items = items.len(),
        sustainable_subtotal,
        points_awarded = outcome.points_awarded,
        "scan complete"
    );

    Ok(ScanOutcome {
        scan_id,
        items,
        sustainable_subtotal,
        dropped_items: dropped,
        points_awarded: outcome.points_awarded,
        rewards: Some(outcome.state),
    })
}
