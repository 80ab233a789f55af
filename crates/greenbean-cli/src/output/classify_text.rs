use std::io;

use serde_json::Value;

use super::format::{Align, Column, format_money, key_value_rows, render_table};
use super::rewards_text::render_rewards_summary;

const ITEM_COLUMNS: [Column<'static>; 3] = [
    Column {
        name: "Product",
        align: Align::Left,
    },
    Column {
        name: "Price",
        align: Align::Right,
    },
    Column {
        name: "Sustainable",
        align: Align::Left,
    },
];

pub fn render_scan(data: &Value) -> io::Result<String> {
    let items = items_array(data)?;
    let message = data.get("message").and_then(Value::as_str).unwrap_or("");

    let mut lines = vec![message.to_string()];
    if !items.is_empty() {
        lines.push(String::new());
        lines.extend(render_items(items));
        lines.push(String::new());
        lines.extend(render_totals(data));
    }

    if let Some(rewards) = data.get("rewards").filter(|value| value.is_object()) {
        lines.push(String::new());
        lines.push("Your rewards:".to_string());
        lines.extend(render_rewards_summary(rewards));
    }

    Ok(lines.join("\n"))
}

pub fn render_classify(data: &Value) -> io::Result<String> {
    let items = items_array(data)?;
    let source = data
        .get("allow_list_source")
        .and_then(Value::as_str)
        .unwrap_or("bundled");

    let mut lines = vec![format!("Classified with the {source} allow-list."), String::new()];
    if items.is_empty() {
        lines.push("No products found.".to_string());
    } else {
        lines.extend(render_items(items));
    }
    lines.push(String::new());
    lines.extend(render_totals(data));
    Ok(lines.join("\n"))
}

pub fn render_allow_list(data: &Value) -> io::Result<String> {
    let entries = data
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("allow-list output requires entries"))?;
    let source = data.get("source").and_then(Value::as_str).unwrap_or("");

    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                yes_no(entry.get("counts").and_then(Value::as_bool).unwrap_or(false)),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![
        format!("Allow-list ({source}), {} entries:", entries.len()),
        String::new(),
    ];
    lines.extend(render_table(
        &[
            Column {
                name: "Product",
                align: Align::Left,
            },
            Column {
                name: "Counts",
                align: Align::Left,
            },
        ],
        &rows,
    ));
    Ok(lines.join("\n"))
}

fn items_array(data: &Value) -> io::Result<&Vec<Value>> {
    data.get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("classification output requires items"))
}

fn render_items(items: &[Value]) -> Vec<String> {
    let rows = items
        .iter()
        .map(|item| {
            vec![
                item.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                format_money(item.get("price").and_then(Value::as_f64).unwrap_or(0.0)),
                yes_no(
                    item.get("sustainable")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                ),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    render_table(&ITEM_COLUMNS, &rows)
}

fn render_totals(data: &Value) -> Vec<String> {
    let subtotal = data
        .get("sustainable_subtotal")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let mut entries = vec![("Sustainable subtotal", format_money(subtotal))];

    let dropped = data
        .get("dropped_items")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if dropped > 0 {
        entries.push(("Unreadable lines skipped", dropped.to_string()));
    }

    if let Some(points) = data.get("points_awarded").and_then(Value::as_i64) {
        entries.push(("Points awarded", points.to_string()));
    }

    key_value_rows(&entries, 2)
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
