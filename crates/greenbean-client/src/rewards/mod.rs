mod badges;
mod bonus;
mod engine;
mod store;

use std::collections::BTreeSet;

use serde::Serialize;

pub use badges::{BADGE_THRESHOLDS, BadgeThreshold, badge_for_points, next_badge};
pub use bonus::{BonusEvent, BonusKind, MEDICINE_LOG_POINTS, POINTS_PER_DOLLAR, base_points};
pub use engine::{ActivityOutcome, RewardsEngine};
pub use store::{MemoryRewardsStore, RewardsStore, SqliteRewardsStore};

/// The single per-user rewards record.
///
/// `current_badge` is always the label of the highest threshold at or below
/// `total_points`, or `None` below the lowest threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardsState {
    pub total_points: i64,
    pub current_badge: Option<String>,
    pub bonuses_granted: BTreeSet<BonusKind>,
    pub logged_medicines: BTreeSet<String>,
}

impl RewardsState {
    pub fn has_received_first_purchase_bonus(&self) -> bool {
        self.bonuses_granted.contains(&BonusKind::FirstPurchase)
    }
}
