use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeThreshold {
    pub min_points: i64,
    pub label: &'static str,
}

/// Ascending by `min_points`.
pub const BADGE_THRESHOLDS: [BadgeThreshold; 3] = [
    BadgeThreshold {
        min_points: 100,
        label: "Planet Caretaker",
    },
    BadgeThreshold {
        min_points: 500,
        label: "Ecological Hero",
    },
    BadgeThreshold {
        min_points: 2000,
        label: "Sustainability Champion",
    },
];

/// Highest tier whose threshold is at or below `points`.
pub fn badge_for_points(points: i64) -> Option<&'static str> {
    BADGE_THRESHOLDS
        .iter()
        .take_while(|threshold| threshold.min_points <= points)
        .last()
        .map(|threshold| threshold.label)
}

pub fn next_badge(points: i64) -> Option<BadgeThreshold> {
    BADGE_THRESHOLDS
        .iter()
        .find(|threshold| threshold.min_points > points)
        .copied()
}

pub(crate) fn tier_rank(label: Option<&str>) -> usize {
    match label {
        Some(value) => BADGE_THRESHOLDS
            .iter()
            .position(|threshold| threshold.label == value)
            .map_or(0, |index| index + 1),
        None => 0,
    }
}
