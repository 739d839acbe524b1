//! Diff generation for audit logging

use serde_json::Value;

/// Summarize top-level field changes between two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes: Vec<String> = before_obj
                .iter()
                .filter_map(|(key, before_val)| match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => Some(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => None,
                    None => Some(format!("{}: {} -> (removed)", key, format_value(before_val))),
                })
                .collect();

            changes.extend(
                after_obj
                    .iter()
                    .filter(|(key, _)| !before_obj.contains_key(*key))
                    .map(|(key, after_val)| {
                        format!("{}: (added) -> {}", key, format_value(after_val))
                    }),
            );
            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"name": "Nakuru", "population": 2162202, "project_score": 6});
        let after = json!({"name": "Nakuru", "population": 2200000, "project_score": 7});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("population: 2162202 -> 2200000"));
        assert!(diff.contains("project_score: 6 -> 7"));
        assert!(!diff.contains("name"));
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"name": "Test", "old": "value"});
        let after = json!({"name": "Test", "new": 1});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("old: \"value\" -> (removed)"));
        assert!(diff.contains("new: (added) -> 1"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Test", "value": 100});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_scalar_change() {
        assert_eq!(
            generate_diff(&json!(1), &json!(2)),
            Some("1 -> 2".to_string())
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!("kiambu")), "\"kiambu\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");

        let long = format_value(&json!("x".repeat(80)));
        assert!(long.ends_with("...\""));
        assert_eq!(long.len(), 47 + 5);
    }
}
