use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::badges::{badge_for_points, tier_rank};
use super::bonus::{BonusEvent, BonusKind, MEDICINE_LOG_POINTS, base_points};
use super::{RewardsState, RewardsStore};
use crate::classify::normalize_product_name;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityOutcome {
    pub points_awarded: i64,
    pub state: RewardsState,
}

/// Owns the rewards state and its store. Every mutation is serialized by an
/// internal lock and applied to the freshly read stored state inside a store
/// update, so engines sharing one store never lose each other's points. The
/// cached state is refreshed only after the write succeeds.
pub struct RewardsEngine<S: RewardsStore> {
    store: S,
    state: Mutex<RewardsState>,
}

impl<S: RewardsStore> RewardsEngine<S> {
    pub fn open(store: S) -> ClientResult<Self> {
        let state = store.load()?;
        tracing::debug!(
            total_points = state.total_points,
            badge = state.current_badge.as_deref().unwrap_or("none"),
            "loaded rewards state"
        );
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    pub fn state(&self) -> RewardsState {
        self.lock().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scores a purchase and returns the updated state.
    pub fn compute_points(&self, spent: f64, event: Option<&str>) -> ClientResult<RewardsState> {
        self.award_purchase(spent, event).map(|outcome| outcome.state)
    }

    /// Like `compute_points`, also reporting how many points were added.
    pub fn award_purchase(&self, spent: f64, event: Option<&str>) -> ClientResult<ActivityOutcome> {
        if !spent.is_finite() || spent < 0.0 {
            return Err(ClientError::invalid_argument_with_recovery(
                &format!("Spend must be a non-negative dollar amount, got {spent}."),
                vec!["Pass the sustainable subtotal in dollars, e.g. `12.40`.".to_string()],
            ));
        }

        let event_bonus = event_bonus(event);
        let outcome = self.apply(|state| {
            let mut awarded = base_points(spent).saturating_add(event_bonus);
            awarded = awarded.saturating_add(grant_once(state, BonusKind::FirstPurchase));
            add_points(state, awarded);
            awarded
        })?;

        tracing::info!(
            spent,
            event = event.unwrap_or("none"),
            points_awarded = outcome.points_awarded,
            total_points = outcome.state.total_points,
            "purchase scored"
        );
        Ok(outcome)
    }

    /// Grants the one-time bonus for `kind` if it has not been granted yet.
    pub fn record_activity(&self, kind: BonusKind) -> ClientResult<ActivityOutcome> {
        let outcome = self.apply(|state| {
            let awarded = grant_once(state, kind);
            add_points(state, awarded);
            awarded
        })?;

        tracing::info!(
            activity = kind.as_str(),
            points_awarded = outcome.points_awarded,
            "activity recorded"
        );
        Ok(outcome)
    }

    /// Awards points the first time each distinct medicine name is logged.
    pub fn log_medicine(&self, name: &str) -> ClientResult<ActivityOutcome> {
        let key = normalize_product_name(name);
        if key.is_empty() {
            return Err(ClientError::invalid_argument_for_command(
                "Medicine name must not be empty.",
                Some("activity medicine"),
            ));
        }

        let outcome = self.apply(|state| {
            if state.logged_medicines.insert(key.clone()) {
                add_points(state, MEDICINE_LOG_POINTS);
                MEDICINE_LOG_POINTS
            } else {
                0
            }
        })?;

        tracing::info!(
            medicine = %key,
            points_awarded = outcome.points_awarded,
            "medicine logged"
        );
        Ok(outcome)
    }

    pub fn reset_rewards(&self) -> ClientResult<RewardsState> {
        let outcome = self.apply(|state| {
            *state = RewardsState::default();
            0
        })?;
        tracing::info!("rewards reset");
        Ok(outcome.state)
    }

    /// Runs `mutate` through the store's atomic update and only then swaps
    /// the result in. A failed write leaves the in-memory state untouched.
    fn apply<F>(&self, mutate: F) -> ClientResult<ActivityOutcome>
    where
        F: FnOnce(&mut RewardsState) -> i64,
    {
        let mut guard = self.lock();
        let (next, points_awarded) = match self.store.update(mutate) {
            Ok(updated) => updated,
            Err(error) => {
                tracing::error!(
                    code = %error.code,
                    error = %error.message,
                    "failed to persist rewards state; update discarded"
                );
                return Err(ClientError::rewards_persist_failed(&error.message, &error.code));
            }
        };

        *guard = next.clone();
        Ok(ActivityOutcome {
            points_awarded,
            state: next,
        })
    }

    fn lock(&self) -> MutexGuard<'_, RewardsState> {
        // The guarded value is only replaced after a successful update, so a
        // poisoned lock still holds a consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn event_bonus(event: Option<&str>) -> i64 {
    let Some(tag) = event.map(str::trim).filter(|tag| !tag.is_empty()) else {
        return 0;
    };
    match BonusEvent::from_tag(tag) {
        Some(known) => known.points(),
        None => {
            tracing::warn!(event = tag, "ignoring unknown bonus event");
            0
        }
    }
}

fn grant_once(state: &mut RewardsState, kind: BonusKind) -> i64 {
    if state.bonuses_granted.insert(kind) {
        kind.points()
    } else {
        0
    }
}

fn add_points(state: &mut RewardsState, points: i64) {
    state.total_points = state.total_points.saturating_add(points);

    let previous = state.current_badge.take();
    let derived = badge_for_points(state.total_points);
    if tier_rank(derived) > tier_rank(previous.as_deref()) {
        tracing::info!(
            from = previous.as_deref().unwrap_or("none"),
            to = derived.unwrap_or("none"),
            "badge upgraded"
        );
    }
    state.current_badge = derived.map(std::string::ToString::to_string);
}
