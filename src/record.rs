use serde_json::{Map, Value};

/// A single row as returned by the REST endpoint. Fields this tool does not
/// know about are kept as-is.
pub type Record = Map<String, Value>;

/// Renders a grouping value as a map key. Strings are used verbatim,
/// everything else by its JSON text, so a missing id groups under "null".
pub fn key_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => Value::Null.to_string(),
    }
}

pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Field value for display, "N/A" when absent or null.
pub fn display_field(record: &Record, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn key_text_handles_strings_numbers_and_missing() {
        assert_eq!(key_text(Some(&json!("a1b2"))), "a1b2");
        assert_eq!(key_text(Some(&json!(42))), "42");
        assert_eq!(key_text(Some(&Value::Null)), "null");
        assert_eq!(key_text(None), "null");
    }

    #[test]
    fn display_field_falls_back_to_na() {
        let blog = record(json!({"name": "Tech Blog", "id": 7, "domain": null}));
        assert_eq!(display_field(&blog, "name"), "Tech Blog");
        assert_eq!(display_field(&blog, "id"), "7");
        assert_eq!(display_field(&blog, "domain"), "N/A");
        assert_eq!(display_field(&blog, "url"), "N/A");
    }

    #[test]
    fn str_field_ignores_non_strings() {
        let post = record(json!({"status": "publish", "blog_id": 3}));
        assert_eq!(str_field(&post, "status"), Some("publish"));
        assert_eq!(str_field(&post, "blog_id"), None);
    }
}
