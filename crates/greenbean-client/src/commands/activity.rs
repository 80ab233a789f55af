use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_setup, open_engine};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ActivityData, RewardsView};
use crate::rewards::BonusKind;

#[derive(Debug, Default)]
pub struct ActivityOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn reminder() -> ClientResult<SuccessEnvelope> {
    reminder_with_options(ActivityOptions::default())
}

/// Inbound "reminder scheduled" event from the expiration reminder scheduler.
#[doc(hidden)]
pub fn reminder_with_options(options: ActivityOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let engine = open_engine(&setup)?;
    let outcome = engine.record_activity(BonusKind::FirstReminder)?;

    let message = if outcome.points_awarded > 0 {
        format!(
            "You earned {} points for setting your first reminder!",
            outcome.points_awarded
        )
    } else {
        "Your reminder was recorded.".to_string()
    };

    success(
        "activity reminder",
        ActivityData {
            activity: BonusKind::FirstReminder.as_str().to_string(),
            subject: None,
            points_awarded: outcome.points_awarded,
            message,
            rewards: RewardsView::from(&outcome.state),
        },
    )
}

pub fn medicine(name: &str) -> ClientResult<SuccessEnvelope> {
    medicine_with_options(name, ActivityOptions::default())
}

/// Inbound "medicine logged" event.
#[doc(hidden)]
pub fn medicine_with_options(
    name: &str,
    options: ActivityOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let engine = open_engine(&setup)?;
    let outcome = engine.log_medicine(name)?;

    let trimmed = name.trim();
    let message = if outcome.points_awarded > 0 {
        format!(
            "Logged {trimmed}. You earned {} points.",
            outcome.points_awarded
        )
    } else {
        format!("{trimmed} was already logged. No new points.")
    };

    success(
        "activity medicine",
        ActivityData {
            activity: "medicine_logged".to_string(),
            subject: Some(trimmed.to_string()),
            points_awarded: outcome.points_awarded,
            message,
            rewards: RewardsView::from(&outcome.state),
        },
    )
}
