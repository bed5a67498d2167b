//! Match locations.
//!
//! A [`Location`] is a route from the document root, not a live reference,
//! so it stays meaningful across clones and can be re-followed in the
//! working copy of an edit.

use std::fmt;

use json_edit_path::{json_pointer, normalized_path, PathComponent};
use serde_json::Value;

/// Route of keys and indices from the document root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    route: Vec<PathComponent>,
}

impl Location {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(route: Vec<PathComponent>) -> Self {
        Self { route }
    }

    pub fn route(&self) -> &[PathComponent] {
        &self.route
    }

    pub fn is_root(&self) -> bool {
        self.route.is_empty()
    }

    /// Route of the owning container; `None` for the root.
    pub fn parent_route(&self) -> Option<&[PathComponent]> {
        self.route.split_last().map(|(_, parent)| parent)
    }

    /// Index or key under which the node sits in its parent; `None` for the
    /// root.
    pub fn key(&self) -> Option<&PathComponent> {
        self.route.last()
    }

    pub fn child(&self, component: PathComponent) -> Self {
        let mut route = self.route.clone();
        route.push(component);
        Self { route }
    }

    /// RFC 6901 JSON Pointer form, e.g. `/items/0`.
    pub fn pointer(&self) -> String {
        json_pointer(&self.route)
    }
}

/// Formats as an RFC 9535 normalized path, e.g. `$['items'][0]`.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&normalized_path(&self.route))
    }
}

impl From<Vec<PathComponent>> for Location {
    fn from(route: Vec<PathComponent>) -> Self {
        Self::new(route)
    }
}

/// One resolved match: the node, its owning container and where it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord<'a> {
    /// The matched node.
    pub value: &'a Value,
    /// The array or object holding `value`; `None` when `value` is the root.
    pub parent: Option<&'a Value>,
    pub location: Location,
}

impl<'a> LocationRecord<'a> {
    pub fn key(&self) -> Option<&PathComponent> {
        self.location.key()
    }

    /// Whether the node is an element of an array.
    pub fn is_array_element(&self) -> bool {
        matches!(self.parent, Some(Value::Array(_)))
    }

    /// Whether the node is a member of an object.
    pub fn is_object_member(&self) -> bool {
        matches!(self.parent, Some(Value::Object(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent_or_key() {
        let root = Location::root();
        assert!(root.is_root());
        assert_eq!(root.parent_route(), None);
        assert_eq!(root.key(), None);
        assert_eq!(root.to_string(), "$");
        assert_eq!(root.pointer(), "");
    }

    #[test]
    fn child_location_splits_into_parent_and_key() {
        let loc = Location::root()
            .child(PathComponent::Key("items".into()))
            .child(PathComponent::Index(2));
        assert_eq!(loc.parent_route(), Some(&[PathComponent::Key("items".into())][..]));
        assert_eq!(loc.key(), Some(&PathComponent::Index(2)));
        assert_eq!(loc.to_string(), "$['items'][2]");
        assert_eq!(loc.pointer(), "/items/2");
    }

    #[test]
    fn locations_order_by_index_numerically() {
        let a = Location::new(vec![PathComponent::Index(2)]);
        let b = Location::new(vec![PathComponent::Index(10)]);
        assert!(a < b);
    }
}
