//! Case-insensitive text search over scalar leaves.

use serde_json::Value;

use crate::value::scalar_text;

/// A leaf whose text contains the needle.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// `$`, then `[index]` per array step and `.key` per object step.
    pub path: String,
    pub value: Value,
}

/// Depth-first search for scalar nodes whose canonical text contains
/// `needle`, ignoring case.
///
/// Only strings, numbers and booleans are tested. Containers are descended
/// into but never reported, and `null` never matches.
pub fn search(doc: &Value, needle: &str) -> Vec<SearchHit> {
    let needle = needle.to_lowercase();
    let mut hits = Vec::new();
    let mut path = String::from("$");
    walk(doc, &needle, &mut path, &mut hits);
    hits
}

fn walk(value: &Value, needle: &str, path: &mut String, hits: &mut Vec<SearchHit>) {
    match value {
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                let len = path.len();
                path.push('[');
                path.push_str(&idx.to_string());
                path.push(']');
                walk(child, needle, path, hits);
                path.truncate(len);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                walk(child, needle, path, hits);
                path.truncate(len);
            }
        }
        _ => {
            if let Some(text) = scalar_text(value) {
                if text.to_lowercase().contains(needle) {
                    hits.push(SearchHit {
                        path: path.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(doc: &Value, needle: &str) -> Vec<String> {
        search(doc, needle).into_iter().map(|hit| hit.path).collect()
    }

    #[test]
    fn leaves_only_case_insensitive() {
        let doc = json!({"items": ["apple", "banana"], "meta": {"fruit": "apple"}});
        let hits = search(&doc, "APPLE");
        assert_eq!(
            hits,
            vec![
                SearchHit {
                    path: "$.items[0]".into(),
                    value: json!("apple"),
                },
                SearchHit {
                    path: "$.meta.fruit".into(),
                    value: json!("apple"),
                },
            ]
        );
    }

    #[test]
    fn numbers_and_booleans_use_canonical_text() {
        let doc = json!({"n": 1024, "f": 2.5, "ok": true, "nothing": null});
        assert_eq!(paths(&doc, "02"), vec!["$.n"]);
        assert_eq!(paths(&doc, ".5"), vec!["$.f"]);
        assert_eq!(paths(&doc, "TRU"), vec!["$.ok"]);
        assert!(paths(&doc, "null").is_empty());
    }

    #[test]
    fn scalar_root() {
        assert_eq!(paths(&json!("Hello"), "ell"), vec!["$"]);
    }

    #[test]
    fn keys_are_not_searched() {
        assert!(paths(&json!({"apple": 1}), "apple").is_empty());
    }

    #[test]
    fn unicode_case_folding() {
        assert_eq!(paths(&json!(["ÉCOLE"]), "école"), vec!["$[0]"]);
    }
}
