use std::io;

use serde_json::Value;

use super::format::{format_points, key_value_rows};

pub fn render_rewards_show(data: &Value) -> io::Result<String> {
    let rewards = rewards_object(data)?;
    let mut lines = vec!["Your rewards:".to_string(), String::new()];
    lines.extend(render_rewards_summary(rewards));
    Ok(lines.join("\n"))
}

pub fn render_rewards_earn(data: &Value) -> io::Result<String> {
    let rewards = rewards_object(data)?;
    let awarded = data
        .get("points_awarded")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let spent = data.get("spent").and_then(Value::as_f64).unwrap_or(0.0);

    let mut lines = vec![
        format!("You earned {} for ${spent:.2}.", format_points(awarded)),
        String::new(),
    ];
    lines.extend(render_rewards_summary(rewards));
    Ok(lines.join("\n"))
}

pub fn render_message_with_rewards(data: &Value) -> io::Result<String> {
    let rewards = rewards_object(data)?;
    let message = data.get("message").and_then(Value::as_str).unwrap_or("");

    let mut lines = vec![message.to_string(), String::new()];
    lines.extend(render_rewards_summary(rewards));
    Ok(lines.join("\n"))
}

pub(super) fn render_rewards_summary(rewards: &Value) -> Vec<String> {
    let total = rewards
        .get("total_points")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let badge = rewards
        .get("current_badge")
        .and_then(Value::as_str)
        .unwrap_or("none yet");

    let mut entries = vec![
        ("Points", total.to_string()),
        ("Badge", badge.to_string()),
    ];

    match rewards.get("next_badge").filter(|value| !value.is_null()) {
        Some(next) => {
            let label = next.get("label").and_then(Value::as_str).unwrap_or("");
            let to_go = next
                .get("points_to_go")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            entries.push(("Next badge", format!("{label} in {}", format_points(to_go))));
        }
        None => entries.push(("Next badge", "all badges earned".to_string())),
    }

    let medicines = rewards
        .get("medicines_logged")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if medicines > 0 {
        entries.push(("Medicines", medicines.to_string()));
    }

    key_value_rows(&entries, 2)
}

fn rewards_object(data: &Value) -> io::Result<&Value> {
    data.get("rewards")
        .filter(|value| value.is_object())
        .ok_or_else(|| io::Error::other("rewards output requires rewards"))
}
