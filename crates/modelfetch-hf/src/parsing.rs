//! JSON parsing functions for listing API responses.
//!
//! Sync functions that turn a raw page body into typed tree entries.

use serde_json::Value;

use crate::error::{HfError, HfResult};
use crate::models::TreeEntry;

/// Parse one page of `GET /{model}/tree/{branch}`.
///
/// The body must be a JSON array and every element must carry a string
/// `path`; anything else is an invalid response.
pub fn parse_tree_entries(json: Value) -> HfResult<Vec<TreeEntry>> {
    let Value::Array(items) = json else {
        return Err(HfError::InvalidResponse {
            message: format!("expected a JSON array of tree entries, got {}", kind_of(&json)),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.get("path").is_some_and(Value::is_string) {
                return Err(HfError::InvalidResponse {
                    message: format!("tree entry {index} has no path"),
                });
            }
            serde_json::from_value(item).map_err(|e| HfError::InvalidResponse {
                message: format!("tree entry {index} is malformed: {e}"),
            })
        })
        .collect()
}

/// Whether the entry describes a directory rather than a file.
pub fn is_directory(entry: &TreeEntry) -> bool {
    entry.entry_type.as_deref() == Some("directory")
}

const fn kind_of(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tree_entries() {
        let entries = parse_tree_entries(json!([
            {"type": "file", "path": "config.json", "size": 651, "oid": "x"},
            {"type": "directory", "path": "onnx", "size": 0, "oid": "y"},
            {"type": "file", "path": "model.safetensors", "size": 135,
             "lfs": {"oid": "abc", "size": 2_000, "pointerSize": 135}}
        ]))
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "config.json");
        assert!(is_directory(&entries[1]));
        assert!(!is_directory(&entries[2]));
        assert_eq!(entries[2].lfs.as_ref().map(|l| l.oid.as_str()), Some("abc"));
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_tree_entries(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_non_array_body_is_invalid() {
        let err = parse_tree_entries(json!({"error": "Repository not found"})).unwrap_err();
        assert!(matches!(err, HfError::InvalidResponse { .. }));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_entry_without_path_is_invalid() {
        let err = parse_tree_entries(json!([
            {"type": "file", "path": "a.txt"},
            {"type": "file", "size": 3}
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("tree entry 1 has no path"));
    }

    #[test]
    fn test_entry_with_non_string_path_is_invalid() {
        let err = parse_tree_entries(json!([{"path": 7}])).unwrap_err();
        assert!(matches!(err, HfError::InvalidResponse { .. }));
    }
}
