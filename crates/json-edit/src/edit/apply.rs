//! Replace, append and delete.

use serde_json::Value;

use super::{plan, remove_slot, write_slot};
use crate::error::EditError;
use crate::resolve::CompiledPath;
use crate::value;

/// Overwrite every node matched by `path` with `new_value`.
///
/// A match at the root replaces the whole document. When both a node and one
/// of its descendants match, the node ends up holding `new_value`.
pub fn replace(doc: &Value, path: &str, new_value: Value) -> Result<Value, EditError> {
    let path = CompiledPath::parse(path)?;
    let mut working = doc.clone();
    for location in plan(path.locations(&working)) {
        write_slot(&mut working, &location, new_value.clone());
    }
    Ok(working)
}

/// Push `new_value` onto every array matched by `path`.
///
/// Fails with [`EditError::TypeMismatch`] if any match is not an array; in
/// that case nothing is appended anywhere.
pub fn append_to_array(doc: &Value, path: &str, new_value: Value) -> Result<Value, EditError> {
    let compiled = CompiledPath::parse(path)?;
    let mut working = doc.clone();

    let records = compiled.resolve(&working);
    if let Some(bad) = records.iter().find(|record| !record.value.is_array()) {
        return Err(EditError::TypeMismatch {
            path: path.to_string(),
            location: bad.location.to_string(),
            pointer: bad.location.pointer(),
            found: value::describe(bad.value),
        });
    }
    let locations = plan(records.into_iter().map(|record| record.location).collect());

    for location in locations {
        if let Some(Value::Array(arr)) = value::get_mut(&mut working, location.route()) {
            arr.push(new_value.clone());
        }
    }
    Ok(working)
}

/// Remove every node matched by `path` from its parent.
///
/// A match at the root has no parent and is skipped.
pub fn delete_at_path(doc: &Value, path: &str) -> Result<Value, EditError> {
    let path = CompiledPath::parse(path)?;
    let mut working = doc.clone();
    for location in plan(path.locations(&working)) {
        remove_slot(&mut working, &location);
    }
    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_all_matches() {
        let doc = json!({"a": [{"x": 1}, {"x": 2}]});
        let out = replace(&doc, "$.a[*].x", json!(0)).unwrap();
        assert_eq!(out, json!({"a": [{"x": 0}, {"x": 0}]}));
    }

    #[test]
    fn replace_root() {
        let out = replace(&json!({"a": 1}), "$", json!([1])).unwrap();
        assert_eq!(out, json!([1]));
    }

    #[test]
    fn replace_overlapping_matches_ancestor_wins() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let out = replace(&doc, "$..*", json!("v")).unwrap();
        assert_eq!(out, json!({"a": "v"}));
    }

    #[test]
    fn append_all_or_nothing() {
        let doc = json!({"l": [], "m": 1});
        let err = append_to_array(&doc, "$['l','m']", json!(9)).unwrap_err();
        assert_eq!(
            err,
            EditError::TypeMismatch {
                path: "$['l','m']".into(),
                location: "$['m']".into(),
                pointer: "/m".into(),
                found: "a number",
            }
        );
    }

    #[test]
    fn append_to_each_distinct_array_once() {
        let doc = json!({"l": [1]});
        let out = append_to_array(&doc, "$['l','l']", json!(2)).unwrap();
        assert_eq!(out, json!({"l": [1, 2]}));
    }

    #[test]
    fn append_to_nested_arrays() {
        let doc = json!([[1], [2]]);
        let out = append_to_array(&doc, "$..[?(@[0])]", json!(0)).unwrap();
        // `@[0]` exists for both inner arrays; the outer root is not a child.
        assert_eq!(out, json!([[1, 0], [2, 0]]));
    }

    #[test]
    fn delete_reverse_slice() {
        let doc = json!(["a", "b", "c", "d"]);
        let out = delete_at_path(&doc, "$[::-2]").unwrap();
        assert_eq!(out, json!(["a", "c"]));
    }

    #[test]
    fn delete_duplicate_union_removes_once() {
        let doc = json!(["a", "b", "c"]);
        let out = delete_at_path(&doc, "$[0, 0]").unwrap();
        assert_eq!(out, json!(["b", "c"]));
    }

    #[test]
    fn delete_nested_and_ancestor() {
        let doc = json!({"a": [{"b": 1}], "c": 2});
        let out = delete_at_path(&doc, "$..*").unwrap();
        assert_eq!(out, json!({}));
    }

    #[test]
    fn delete_root_is_noop() {
        let doc = json!({"a": 1});
        assert_eq!(delete_at_path(&doc, "$").unwrap(), doc);
    }

    #[test]
    fn delete_object_member() {
        let doc = json!({"a": 1, "b": 2});
        assert_eq!(delete_at_path(&doc, "$.a").unwrap(), json!({"b": 2}));
    }
}
