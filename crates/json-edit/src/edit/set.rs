//! Upsert.

use serde_json::Value;

use super::{plan, write_slot};
use crate::error::EditError;
use crate::resolve::CompiledPath;
use crate::value;

/// Overwrite the node at `path`, or create it as a new property.
///
/// When `path` matches, the first match is overwritten, or every match when
/// `apply_to_all` is set. When nothing matches, the final segment must be a
/// single property name and the remaining parent path must resolve to an
/// object; the property is then added to the first such parent. Missing
/// intermediate containers are never created.
pub fn set_at_path(
    doc: &Value,
    path: &str,
    new_value: Value,
    apply_to_all: bool,
) -> Result<Value, EditError> {
    let compiled = CompiledPath::parse(path)?;
    let mut working = doc.clone();

    let mut locations = compiled.locations(&working);
    if !locations.is_empty() {
        if apply_to_all {
            locations = plan(locations);
        } else {
            locations.truncate(1);
        }
        for location in locations {
            write_slot(&mut working, &location, new_value.clone());
        }
        return Ok(working);
    }

    create(&mut working, &compiled, new_value)?;
    Ok(working)
}

fn create(working: &mut Value, path: &CompiledPath, new_value: Value) -> Result<(), EditError> {
    let not_creatable = || EditError::NotCreatable {
        path: path.as_str().to_string(),
    };
    let (parent_path, last) = path.split_last().ok_or_else(not_creatable)?;
    let key = match (last.as_single_name(), last.as_single_index()) {
        (Some(name), _) => Some(name.to_string()),
        (None, Some(_)) => None,
        (None, None) => return Err(not_creatable()),
    };

    let parent = parent_path
        .resolve(working)
        .into_iter()
        .next()
        .ok_or_else(|| EditError::ParentNotFound {
            path: path.as_str().to_string(),
            parent: parent_path.as_str().to_string(),
        })?
        .location;

    let invalid_target = |found: &Value| EditError::InvalidTarget {
        path: path.as_str().to_string(),
        parent: parent.to_string(),
        pointer: parent.pointer(),
        found: value::describe(found),
    };
    match (value::get_mut(working, parent.route()), key) {
        (Some(Value::Object(map)), Some(key)) => {
            map.insert(key, new_value);
            Ok(())
        }
        (Some(found), _) => Err(invalid_target(found)),
        (None, _) => Err(EditError::ParentNotFound {
            path: path.as_str().to_string(),
            parent: parent_path.as_str().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_match_only_by_default() {
        let doc = json!({"a": [{"x": 1}, {"x": 2}]});
        let out = set_at_path(&doc, "$.a[*].x", json!(0), false).unwrap();
        assert_eq!(out, json!({"a": [{"x": 0}, {"x": 2}]}));
    }

    #[test]
    fn all_matches_when_asked() {
        let doc = json!({"a": [{"x": 1}, {"x": 2}]});
        let out = set_at_path(&doc, "$.a[*].x", json!(0), true).unwrap();
        assert_eq!(out, json!({"a": [{"x": 0}, {"x": 0}]}));
    }

    #[test]
    fn creates_trailing_property_at_end() {
        let doc = json!({"user": {"name": "A"}});
        let out = set_at_path(&doc, "$.user.age", json!(30), false).unwrap();
        assert_eq!(out, json!({"user": {"name": "A", "age": 30}}));
        let keys: Vec<_> = out["user"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn creates_bracketed_key_containing_dot() {
        let doc = json!({"cfg": {}});
        let out = set_at_path(&doc, "$.cfg['a.b']", json!(true), false).unwrap();
        assert_eq!(out, json!({"cfg": {"a.b": true}}));
    }

    #[test]
    fn creates_on_first_parent_only() {
        let doc = json!({"a": [{}, {}]});
        let out = set_at_path(&doc, "$.a[*].n", json!(1), true).unwrap();
        assert_eq!(out, json!({"a": [{"n": 1}, {}]}));
    }

    #[test]
    fn missing_parent() {
        let err = set_at_path(&json!({}), "$.user.age", json!(1), false).unwrap_err();
        assert_eq!(
            err,
            EditError::ParentNotFound {
                path: "$.user.age".into(),
                parent: "$.user".into(),
            }
        );
    }

    #[test]
    fn parent_is_not_an_object() {
        let doc = json!({"tags": ["x"]});
        let err = set_at_path(&doc, "$.tags.first", json!(1), false).unwrap_err();
        assert_eq!(
            err,
            EditError::InvalidTarget {
                path: "$.tags.first".into(),
                parent: "$['tags']".into(),
                pointer: "/tags".into(),
                found: "an array",
            }
        );
    }

    #[test]
    fn index_past_the_end_is_not_created() {
        let doc = json!({"tags": ["x"]});
        let err = set_at_path(&doc, "$.tags[3]", json!(1), false).unwrap_err();
        assert!(matches!(err, EditError::InvalidTarget { found: "an array", .. }));

        let err = set_at_path(&doc, "$.nope[0]", json!(1), false).unwrap_err();
        assert!(matches!(err, EditError::ParentNotFound { .. }));
    }

    #[test]
    fn wildcard_tail_without_match_is_not_creatable() {
        let doc = json!({"a": {}});
        let err = set_at_path(&doc, "$.a[*]", json!(1), false).unwrap_err();
        assert_eq!(
            err,
            EditError::NotCreatable {
                path: "$.a[*]".into()
            }
        );
        let err = set_at_path(&doc, "$..zz", json!(1), false).unwrap_err();
        assert_eq!(
            err,
            EditError::NotCreatable {
                path: "$..zz".into()
            }
        );
    }

    #[test]
    fn root_is_overwritten() {
        let out = set_at_path(&json!({"a": 1}), "$", json!(null), false).unwrap();
        assert_eq!(out, json!(null));
    }
}
