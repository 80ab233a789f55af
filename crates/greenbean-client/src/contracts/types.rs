use serde::Serialize;

use crate::classify::ValidatedPurchase;
use crate::rewards::{RewardsState, next_badge};

#[derive(Debug, Clone, Serialize)]
pub struct NextBadge {
    pub label: String,
    pub min_points: i64,
    pub points_to_go: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardsView {
    pub total_points: i64,
    pub current_badge: Option<String>,
    pub has_received_first_purchase_bonus: bool,
    pub bonuses_granted: Vec<String>,
    pub medicines_logged: usize,
    pub next_badge: Option<NextBadge>,
}

impl From<&RewardsState> for RewardsView {
    fn from(state: &RewardsState) -> Self {
        Self {
            total_points: state.total_points,
            current_badge: state.current_badge.clone(),
            has_received_first_purchase_bonus: state.has_received_first_purchase_bonus(),
            bonuses_granted: state
                .bonuses_granted
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            medicines_logged: state.logged_medicines.len(),
            next_badge: next_badge(state.total_points).map(|threshold| NextBadge {
                label: threshold.label.to_string(),
                min_points: threshold.min_points,
                points_to_go: threshold.min_points - state.total_points,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanData {
    pub scan_id: String,
    pub image_path: String,
    pub dry_run: bool,
    pub message: String,
    pub items: Vec<ValidatedPurchase>,
    pub sustainable_subtotal: f64,
    pub dropped_items: usize,
    pub points_awarded: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardsView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyData {
    pub path: String,
    pub allow_list_source: String,
    pub items: Vec<ValidatedPurchase>,
    pub sustainable_subtotal: f64,
    pub dropped_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardsShowData {
    pub rewards: RewardsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardsEarnData {
    pub spent: f64,
    pub event: Option<String>,
    pub points_awarded: i64,
    pub rewards: RewardsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardsResetData {
    pub message: String,
    pub rewards: RewardsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityData {
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub points_awarded: i64,
    pub message: String,
    pub rewards: RewardsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllowListEntry {
    pub name: String,
    pub counts: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllowListData {
    pub source: String,
    pub total: usize,
    pub entries: Vec<AllowListEntry>,
}

#[cfg(test)]
mod tests {
    use super::RewardsView;
    use crate::rewards::{BonusKind, RewardsState};

    #[test]
    fn view_reports_next_badge_distance() {
        let mut state = RewardsState {
            total_points: 110,
            current_badge: Some("Planet Caretaker".to_string()),
            ..RewardsState::default()
        };
        state.bonuses_granted.insert(BonusKind::FirstPurchase);

        let view = RewardsView::from(&state);
        assert!(view.has_received_first_purchase_bonus);
        assert_eq!(view.bonuses_granted, vec!["first_purchase".to_string()]);
        let next = view.next_badge;
        assert!(next.is_some());
        if let Some(next) = next {
            assert_eq!(next.label, "Ecological Hero");
            assert_eq!(next.points_to_go, 390);
        }
    }
}
