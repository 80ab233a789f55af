//! Line item classification.
//!
//! Display is permissive: every line item with a name and a usable price is
//! kept. Reward eligibility is strict: only items whose normalized name is
//! allow-listed contribute to the sustainable subtotal.

mod allow_list;
mod normalize;

use serde::Serialize;

use crate::extraction::RawLineItem;

pub use allow_list::AllowList;
pub use normalize::normalize_product_name;
use normalize::{cents_to_price, price_to_cents};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedPurchase {
    pub name: String,
    pub price: f64,
    pub sustainable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub items: Vec<ValidatedPurchase>,
    pub sustainable_subtotal: f64,
    pub dropped: usize,
}

impl Classification {
    pub fn sustainable_items(&self) -> impl Iterator<Item = &ValidatedPurchase> {
        self.items.iter().filter(|item| item.sustainable)
    }
}

pub fn classify(raw_items: &[RawLineItem], allow_list: &AllowList) -> Classification {
    let mut items = Vec::with_capacity(raw_items.len());
    let mut subtotal_cents = 0_i64;
    let mut dropped = 0_usize;

    for raw in raw_items {
        let Some((purchase, cents)) = validate_item(raw, allow_list) else {
            dropped += 1;
            tracing::debug!(
                description = raw.description.as_deref().unwrap_or("<missing>"),
                total = ?raw.total,
                "dropped unusable line item"
            );
            continue;
        };

        if purchase.sustainable {
            subtotal_cents = subtotal_cents.saturating_add(cents);
        }
        items.push(purchase);
    }

    if dropped > 0 {
        tracing::warn!(dropped, kept = items.len(), "some receipt line items were unusable");
    }

    Classification {
        items,
        sustainable_subtotal: cents_to_price(subtotal_cents),
        dropped,
    }
}

fn validate_item(raw: &RawLineItem, allow_list: &AllowList) -> Option<(ValidatedPurchase, i64)> {
    let name = raw.description.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }

    let price = raw.total?;
    let cents = price_to_cents(price)?;

    let purchase = ValidatedPurchase {
        name: name.to_string(),
        price,
        sustainable: allow_list.is_sustainable(name),
    };
    Some((purchase, cents))
}
