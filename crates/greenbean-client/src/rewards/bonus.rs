use serde::Serialize;

pub const POINTS_PER_DOLLAR: i64 = 5;
pub const MEDICINE_LOG_POINTS: i64 = 50;

/// One-time bonuses. Each is granted at most once until the rewards are reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    FirstPurchase,
    FirstReminder,
}

impl BonusKind {
    pub const ALL: [BonusKind; 2] = [BonusKind::FirstPurchase, BonusKind::FirstReminder];

    pub fn points(self) -> i64 {
        match self {
            Self::FirstPurchase => 50,
            Self::FirstReminder => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstPurchase => "first_purchase",
            Self::FirstReminder => "first_reminder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Repeatable event tags that can ride along with a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusEvent {
    Birthday,
    Referral,
}

impl BonusEvent {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "birthday" => Some(Self::Birthday),
            "referral" => Some(Self::Referral),
            _ => None,
        }
    }

    pub fn points(self) -> i64 {
        match self {
            Self::Birthday => 100,
            Self::Referral => 150,
        }
    }
}

/// Whole dollars earn points; cents are truncated before multiplying.
/// Spends too large for the points counter saturate at `i64::MAX`.
pub fn base_points(spent: f64) -> i64 {
    let dollars = spent.trunc();
    if dollars >= i64::MAX as f64 {
        return i64::MAX;
    }
    (dollars as i64).saturating_mul(POINTS_PER_DOLLAR)
}
