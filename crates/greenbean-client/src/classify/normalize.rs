/// Canonical form used on both sides of an allow-list comparison: trimmed,
/// internal whitespace collapsed to single spaces, ASCII uppercase.
pub fn normalize_product_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// `None` for negative or non-finite prices, and for prices whose cents do
/// not fit in an `i64`.
pub(crate) fn price_to_cents(price: f64) -> Option<i64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    let cents = (price * 100.0).round();
    if cents >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

pub(crate) fn cents_to_price(cents: i64) -> f64 {
    cents as f64 / 100.0
}
