use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_setup, open_engine};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{RewardsEarnData, RewardsResetData, RewardsShowData, RewardsView};

#[derive(Debug, Default)]
pub struct RewardsOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn show() -> ClientResult<SuccessEnvelope> {
    show_with_options(RewardsOptions::default())
}

#[doc(hidden)]
pub fn show_with_options(options: RewardsOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let engine = open_engine(&setup)?;
    let state = engine.state();

    success(
        "rewards show",
        RewardsShowData {
            rewards: RewardsView::from(&state),
        },
    )
}

pub fn earn(spent: f64, event: Option<String>) -> ClientResult<SuccessEnvelope> {
    earn_with_options(spent, event, RewardsOptions::default())
}

/// Logs a purchase by hand, e.g. when the receipt was checked elsewhere.
#[doc(hidden)]
pub fn earn_with_options(
    spent: f64,
    event: Option<String>,
    options: RewardsOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let engine = open_engine(&setup)?;
    let outcome = engine.award_purchase(spent, event.as_deref())?;

    success(
        "rewards earn",
        RewardsEarnData {
            spent,
            event,
            points_awarded: outcome.points_awarded,
            rewards: RewardsView::from(&outcome.state),
        },
    )
}

pub fn reset() -> ClientResult<SuccessEnvelope> {
    reset_with_options(RewardsOptions::default())
}

#[doc(hidden)]
pub fn reset_with_options(options: RewardsOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let engine = open_engine(&setup)?;
    let state = engine.reset_rewards()?;

    success(
        "rewards reset",
        RewardsResetData {
            message: "Points, badge and one-time bonuses were reset.".to_string(),
            rewards: RewardsView::from(&state),
        },
    )
}
