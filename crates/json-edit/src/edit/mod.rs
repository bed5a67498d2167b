//! Non-destructive edits addressed by path expressions.
//!
//! Every operation follows the same protocol: clone the input, resolve the
//! path against the clone, edit the clone, return it. The caller's value is
//! never touched, and an error means no document was produced.
//!
//! Resolved routes are turned into a slot plan before anything is written:
//! duplicates are dropped and the rest is sorted in descending route order.
//! Within one array that puts higher indices first, and it puts descendants
//! before their ancestors, so removing a slot never invalidates a route that
//! is still waiting to be processed.

mod apply;
mod set;

pub use apply::{append_to_array, delete_at_path, replace};
pub use set::set_at_path;

use json_edit_path::PathComponent;
use serde_json::Value;

use crate::error::EditError;
use crate::location::Location;
use crate::value;

/// One mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Overwrite every match.
    Replace { path: String, value: Value },
    /// Push onto every matched array.
    Append { path: String, value: Value },
    /// Upsert: overwrite the first match (or all of them), else create a
    /// trailing property on an existing object.
    Set {
        path: String,
        value: Value,
        apply_to_all: bool,
    },
    /// Remove every match from its parent.
    Delete { path: String },
}

impl Edit {
    pub fn apply(&self, doc: &Value) -> Result<Value, EditError> {
        match self {
            Edit::Replace { path, value } => replace(doc, path, value.clone()),
            Edit::Append { path, value } => append_to_array(doc, path, value.clone()),
            Edit::Set {
                path,
                value,
                apply_to_all,
            } => set_at_path(doc, path, value.clone(), *apply_to_all),
            Edit::Delete { path } => delete_at_path(doc, path),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Edit::Replace { path, .. }
            | Edit::Append { path, .. }
            | Edit::Set { path, .. }
            | Edit::Delete { path } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Edit::Replace { .. } => "replace",
            Edit::Append { .. } => "append",
            Edit::Set { .. } => "set",
            Edit::Delete { .. } => "delete",
        }
    }
}

/// Deduplicate and order routes so that length-changing edits stay valid.
fn plan(mut locations: Vec<Location>) -> Vec<Location> {
    locations.sort_unstable_by(|a, b| b.cmp(a));
    locations.dedup();
    locations
}

/// Overwrite the slot at `location`; the root slot is the document itself.
fn write_slot(doc: &mut Value, location: &Location, new_value: Value) {
    if let Some(slot) = value::get_mut(doc, location.route()) {
        *slot = new_value;
    }
}

/// Remove the node at `location` from its parent. The root has no parent
/// and is left alone.
fn remove_slot(doc: &mut Value, location: &Location) {
    let (Some(parent_route), Some(key)) = (location.parent_route(), location.key()) else {
        return;
    };
    match (value::get_mut(doc, parent_route), key) {
        (Some(Value::Array(arr)), PathComponent::Index(idx)) if *idx < arr.len() => {
            arr.remove(*idx);
        }
        (Some(Value::Object(map)), PathComponent::Key(key)) => {
            map.shift_remove(key);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(route: Vec<PathComponent>) -> Location {
        Location::new(route)
    }

    #[test]
    fn plan_sorts_descending_and_dedups() {
        let items = PathComponent::Key("items".into());
        let planned = plan(vec![
            at(vec![items.clone(), PathComponent::Index(0)]),
            at(vec![items.clone(), PathComponent::Index(2)]),
            at(vec![items.clone(), PathComponent::Index(0)]),
            at(vec![items.clone()]),
            at(vec![items.clone(), PathComponent::Index(10)]),
        ]);
        assert_eq!(
            planned,
            vec![
                at(vec![items.clone(), PathComponent::Index(10)]),
                at(vec![items.clone(), PathComponent::Index(2)]),
                at(vec![items.clone(), PathComponent::Index(0)]),
                at(vec![items]),
            ]
        );
    }

    #[test]
    fn remove_slot_keeps_key_order() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        remove_slot(&mut doc, &at(vec![PathComponent::Key("a".into())]));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn root_slot() {
        let mut doc = json!({"a": 1});
        remove_slot(&mut doc, &Location::root());
        assert_eq!(doc, json!({"a": 1}));
        write_slot(&mut doc, &Location::root(), json!(7));
        assert_eq!(doc, json!(7));
    }

    #[test]
    fn edit_dispatch() {
        let doc = json!({"items": [1]});
        let edit = Edit::Append {
            path: "$.items".into(),
            value: json!(2),
        };
        assert_eq!(edit.apply(&doc).unwrap(), json!({"items": [1, 2]}));
        assert_eq!(edit.name(), "append");
        assert_eq!(edit.path(), "$.items");
    }
}
