use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ExtractionError, RawLineItem};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExtractionRequest {
    pub(crate) file_name: String,
    pub(crate) file_data: String,
}

impl ExtractionRequest {
    pub(crate) fn new(file_name: &str, image: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            file_data: STANDARD.encode(image),
        }
    }
}

/// Decodes an extraction response body into raw line items.
///
/// The body must be a JSON object with a `line_items` array. Entries that are
/// not objects, or whose fields have the wrong type, come back with `None`
/// fields rather than failing the whole response.
pub fn decode_line_items(body: &[u8]) -> Result<Vec<RawLineItem>, ExtractionError> {
    let parsed = serde_json::from_slice::<Value>(body)
        .map_err(|error| ExtractionError::Decode(format!("body is not JSON: {error}")))?;

    let Some(object) = parsed.as_object() else {
        return Err(ExtractionError::Decode(
            "body must be a JSON object".to_string(),
        ));
    };

    let Some(items) = object.get("line_items").and_then(Value::as_array) else {
        return Err(ExtractionError::Decode(
            "body has no `line_items` array".to_string(),
        ));
    };

    Ok(items.iter().map(read_line_item).collect())
}

fn read_line_item(value: &Value) -> RawLineItem {
    let Some(object) = value.as_object() else {
        return RawLineItem {
            description: None,
            total: None,
        };
    };

    RawLineItem {
        description: read_optional_string(object, "description"),
        total: read_optional_number(object, "total"),
    }
}

fn read_optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(std::string::ToString::to_string)
}

fn read_optional_number(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{ExtractionRequest, decode_line_items};
    use crate::extraction::{ExtractionError, RawLineItem};

    #[test]
    fn request_body_base64_encodes_image() {
        let request = ExtractionRequest::new("receipt.jpg", &[0xFF, 0xD8, 0xFF]);
        let value = serde_json::to_value(&request);
        assert!(value.is_ok());
        if let Ok(json) = value {
            assert_eq!(json["file_name"], "receipt.jpg");
            assert_eq!(json["file_data"], "/9j/");
        }
    }

    #[test]
    fn decodes_line_items_and_keeps_partial_entries() {
        let body = br#"{
            "vendor": {"name": "Market"},
            "line_items": [
                {"description": "EB ORG LRG BROWN EGG", "total": 6.99, "quantity": 1},
                {"description": "BAG FEE", "total": null},
                {"total": 3},
                {"description": "SODA", "total": "2.50"},
                "garbage"
            ]
        }"#;

        let decoded = decode_line_items(body);
        assert_eq!(
            decoded,
            Ok(vec![
                RawLineItem::new("EB ORG LRG BROWN EGG", 6.99),
                RawLineItem {
                    description: Some("BAG FEE".to_string()),
                    total: None,
                },
                RawLineItem {
                    description: None,
                    total: Some(3.0),
                },
                RawLineItem {
                    description: Some("SODA".to_string()),
                    total: None,
                },
                RawLineItem {
                    description: None,
                    total: None,
                },
            ])
        );
    }

    #[test]
    fn empty_line_items_is_not_an_error() {
        assert_eq!(decode_line_items(br#"{"line_items": []}"#), Ok(Vec::new()));
    }

    #[test]
    fn rejects_non_json_and_missing_line_items() {
        assert!(matches!(
            decode_line_items(b"<html>oops</html>"),
            Err(ExtractionError::Decode(_))
        ));
        assert!(matches!(
            decode_line_items(br#"{"items": []}"#),
            Err(ExtractionError::Decode(_))
        ));
        assert!(matches!(
            decode_line_items(br#"[{"description": "EGG", "total": 1}]"#),
            Err(ExtractionError::Decode(_))
        ));
    }
}
