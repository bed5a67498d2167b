//! Path resolution: expression + document -> location records.

use json_edit_path::{JsonPathEval, JsonPathParser, PathSegment, SpannedPath, JSONPath};
use serde_json::Value;

use crate::error::EditError;
use crate::location::{Location, LocationRecord};
use crate::value;

/// A parsed path expression that keeps its source text for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    source: String,
    parsed: SpannedPath,
}

impl CompiledPath {
    /// Parse `expr`, failing with [`EditError::InvalidPath`].
    pub fn parse(expr: &str) -> Result<Self, EditError> {
        let parsed = JsonPathParser::parse_spanned(expr).map_err(|source| EditError::InvalidPath {
            path: expr.to_string(),
            source,
        })?;
        Ok(Self {
            source: expr.to_string(),
            parsed,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> &JSONPath {
        &self.parsed.path
    }

    /// Resolve against `doc`, in the evaluator's traversal order.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Vec<LocationRecord<'a>> {
        JsonPathEval::eval_nodes(&self.parsed.path, doc)
            .into_iter()
            .map(|node| {
                let location = Location::new(node.path);
                let parent = location.parent_route().and_then(|route| value::get(doc, route));
                LocationRecord {
                    value: node.value,
                    parent,
                    location,
                }
            })
            .collect()
    }

    /// Locations of all matches, without borrowing the document.
    pub fn locations(&self, doc: &Value) -> Vec<Location> {
        JsonPathEval::eval_nodes(&self.parsed.path, doc)
            .into_iter()
            .map(|node| Location::new(node.path))
            .collect()
    }

    /// Split off the final segment. The parent expression is the source text
    /// up to where that segment starts, so quoted or bracketed segments are
    /// never cut at an inner `.`. `None` for the bare root `$`.
    pub fn split_last(&self) -> Option<(CompiledPath, &PathSegment)> {
        let (last, segments) = self.parsed.path.segments.split_last()?;
        let (last_span, spans) = self.parsed.spans.split_last()?;
        let parent = CompiledPath {
            source: self.source[..last_span.start].to_string(),
            parsed: SpannedPath {
                path: JSONPath::new(segments.to_vec()),
                spans: spans.to_vec(),
            },
        };
        Some((parent, last))
    }
}

/// Resolve `expr` against `doc`.
///
/// Zero matches is an empty result, not an error.
pub fn resolve<'a>(doc: &'a Value, expr: &str) -> Result<Vec<LocationRecord<'a>>, EditError> {
    Ok(CompiledPath::parse(expr)?.resolve(doc))
}

/// Values matched by `expr`, in resolution order.
pub fn query(doc: &Value, expr: &str) -> Result<Vec<Value>, EditError> {
    Ok(resolve(doc, expr)?
        .into_iter()
        .map(|record| record.value.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_edit_path::PathComponent;
    use serde_json::json;

    #[test]
    fn records_carry_parent_and_key() {
        let doc = json!({"items": [10, 20]});
        let records = resolve(&doc, "$.items[1]").unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.value, &json!(20));
        assert_eq!(record.parent, Some(&json!([10, 20])));
        assert_eq!(record.key(), Some(&PathComponent::Index(1)));
        assert!(record.is_array_element());
    }

    #[test]
    fn root_record_has_no_parent() {
        let doc = json!({"a": 1});
        let records = resolve(&doc, "$").unwrap();
        assert_eq!(records[0].parent, None);
        assert!(records[0].location.is_root());
        assert!(!records[0].is_object_member());
    }

    #[test]
    fn invalid_path_keeps_expression() {
        let err = resolve(&json!({}), "$.a[").unwrap_err();
        match err {
            EditError::InvalidPath { path, .. } => assert_eq!(path, "$.a["),
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }

    #[test]
    fn no_match_is_empty() {
        assert!(query(&json!({"a": 1}), "$.b").unwrap().is_empty());
    }

    #[test]
    fn split_last_respects_brackets() {
        let path = CompiledPath::parse("$['a.b'][\"c.d\"].e").unwrap();
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.as_str(), "$['a.b'][\"c.d\"]");
        assert_eq!(last.as_single_name(), Some("e"));

        let path = CompiledPath::parse("$.x['k.y']").unwrap();
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.as_str(), "$.x");
        assert_eq!(last.as_single_name(), Some("k.y"));

        assert!(CompiledPath::parse("$").unwrap().split_last().is_none());
    }
}
