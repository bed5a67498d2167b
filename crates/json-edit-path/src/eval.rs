//! JSONPath evaluator.

use std::cmp::Ordering;

use crate::types::*;
use regex::Regex;
use serde_json::Value;

/// JSONPath evaluator.
pub struct JsonPathEval;

impl JsonPathEval {
    /// Evaluate a JSONPath against a JSON document.
    ///
    /// Returns a vector of references to matching values.
    pub fn eval<'a>(path: &JSONPath, doc: &'a Value) -> Vec<&'a Value> {
        Self::eval_nodes(path, doc)
            .into_iter()
            .map(|node| node.value)
            .collect()
    }

    /// Evaluate a JSONPath and keep the normalized path of every match.
    ///
    /// Nodes come back in document traversal order: segments left to right,
    /// selectors in the order written, children in array or insertion order,
    /// and a descendant segment visits a node before its children.
    pub fn eval_nodes<'a>(path: &JSONPath, doc: &'a Value) -> Vec<JsonPathNode<'a>> {
        Self::eval_from(path, doc, doc)
    }

    fn eval_from<'a>(path: &JSONPath, start: &'a Value, root: &Value) -> Vec<JsonPathNode<'a>> {
        let mut results = vec![JsonPathNode {
            value: start,
            path: Vec::new(),
        }];

        for segment in &path.segments {
            let mut next = Vec::new();
            for node in &results {
                if segment.recursive {
                    let selectors = &segment.selectors;
                    Self::eval_recursive(node.value, selectors, &node.path, root, &mut next);
                } else {
                    for selector in &segment.selectors {
                        Self::eval_selector(node.value, selector, &node.path, root, &mut next);
                    }
                }
            }
            results = next;
        }

        results
    }

    fn eval_recursive<'a>(
        value: &'a Value,
        selectors: &[Selector],
        current_path: &[PathComponent],
        root: &Value,
        results: &mut Vec<JsonPathNode<'a>>,
    ) {
        // First, try to match at current level
        for selector in selectors {
            Self::eval_selector(value, selector, current_path, root, results);
        }

        // Then recurse into children
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = push(current_path, PathComponent::Key(key.clone()));
                    Self::eval_recursive(child, selectors, &child_path, root, results);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let child_path = push(current_path, PathComponent::Index(idx));
                    Self::eval_recursive(child, selectors, &child_path, root, results);
                }
            }
            _ => {}
        }
    }

    fn eval_selector<'a>(
        value: &'a Value,
        selector: &Selector,
        current_path: &[PathComponent],
        root: &Value,
        results: &mut Vec<JsonPathNode<'a>>,
    ) {
        match selector {
            Selector::Name(name) => {
                if let Some(child) = value.as_object().and_then(|map| map.get(name)) {
                    results.push(JsonPathNode {
                        value: child,
                        path: push(current_path, PathComponent::Key(name.clone())),
                    });
                }
            }
            Selector::Index(index) => {
                if let Value::Array(arr) = value {
                    if let Some(idx) = normalize_index(*index, arr.len()) {
                        results.push(JsonPathNode {
                            value: &arr[idx],
                            path: push(current_path, PathComponent::Index(idx)),
                        });
                    }
                }
            }
            Selector::Wildcard => {
                Self::each_child(value, current_path, |_| true, results);
            }
            Selector::Slice { start, end, step } => {
                if let Value::Array(arr) = value {
                    for idx in slice_indices(arr.len(), *start, *end, *step) {
                        results.push(JsonPathNode {
                            value: &arr[idx],
                            path: push(current_path, PathComponent::Index(idx)),
                        });
                    }
                }
            }
            Selector::Filter(expr) => {
                let keep = |child: &Value| Self::eval_filter(expr, child, root);
                Self::each_child(value, current_path, keep, results);
            }
        }
    }

    fn each_child<'a>(
        value: &'a Value,
        current_path: &[PathComponent],
        mut keep: impl FnMut(&Value) -> bool,
        results: &mut Vec<JsonPathNode<'a>>,
    ) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if keep(child) {
                        results.push(JsonPathNode {
                            value: child,
                            path: push(current_path, PathComponent::Key(key.clone())),
                        });
                    }
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    if keep(child) {
                        results.push(JsonPathNode {
                            value: child,
                            path: push(current_path, PathComponent::Index(idx)),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn eval_filter(expr: &FilterExpression, current: &Value, root: &Value) -> bool {
        match expr {
            FilterExpression::Existence { path, from_root } => {
                let start = if *from_root { root } else { current };
                !Self::eval_from(path, start, root).is_empty()
            }
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => {
                let left_val = Self::eval_value_expr(left, current, root);
                let right_val = Self::eval_value_expr(right, current, root);
                Self::compare(operator, &left_val, &right_val)
            }
            FilterExpression::Logical {
                operator,
                left,
                right,
            } => match operator {
                LogicalOperator::And => {
                    Self::eval_filter(left, current, root)
                        && Self::eval_filter(right, current, root)
                }
                LogicalOperator::Or => {
                    Self::eval_filter(left, current, root)
                        || Self::eval_filter(right, current, root)
                }
            },
            FilterExpression::Negation(expr) => !Self::eval_filter(expr, current, root),
            FilterExpression::Paren(expr) => Self::eval_filter(expr, current, root),
            FilterExpression::Function { name, args } => {
                Self::eval_function(name, args, current, root).is_some_and(|v| is_truthy(&v))
            }
        }
    }

    fn eval_value_expr(expr: &ValueExpression, current: &Value, root: &Value) -> Option<Value> {
        match expr {
            ValueExpression::Current => Some(current.clone()),
            ValueExpression::Root => Some(root.clone()),
            ValueExpression::Literal(v) => Some(v.clone()),
            ValueExpression::Path(path) => Self::eval_from(path, current, root)
                .first()
                .map(|node| node.value.clone()),
            ValueExpression::RootPath(path) => Self::eval_from(path, root, root)
                .first()
                .map(|node| node.value.clone()),
            ValueExpression::Function { name, args } => {
                Self::eval_function(name, args, current, root)
            }
        }
    }

    /// Nodes produced by a query-valued argument, or `None` for literals and
    /// function results.
    fn eval_nodelist<'a>(
        expr: &ValueExpression,
        current: &'a Value,
        root: &'a Value,
    ) -> Option<Vec<&'a Value>> {
        match expr {
            ValueExpression::Current => Some(vec![current]),
            ValueExpression::Root => Some(vec![root]),
            ValueExpression::Path(path) => Some(
                Self::eval_from(path, current, root)
                    .into_iter()
                    .map(|node| node.value)
                    .collect(),
            ),
            ValueExpression::RootPath(path) => Some(
                Self::eval_from(path, root, root)
                    .into_iter()
                    .map(|node| node.value)
                    .collect(),
            ),
            ValueExpression::Literal(_) | ValueExpression::Function { .. } => None,
        }
    }

    /// Evaluate one of the RFC 9535 function extensions. Unknown functions
    /// and arity mismatches yield `None` ("Nothing").
    fn eval_function(
        name: &str,
        args: &[ValueExpression],
        current: &Value,
        root: &Value,
    ) -> Option<Value> {
        match (name, args) {
            ("length", [arg]) => match Self::eval_value_expr(arg, current, root)? {
                Value::String(s) => Some(Value::from(s.chars().count())),
                Value::Array(arr) => Some(Value::from(arr.len())),
                Value::Object(map) => Some(Value::from(map.len())),
                _ => None,
            },
            ("count", [arg]) => {
                Self::eval_nodelist(arg, current, root).map(|nodes| Value::from(nodes.len()))
            }
            ("value", [arg]) => match Self::eval_nodelist(arg, current, root)?.as_slice() {
                [single] => Some((*single).clone()),
                _ => None,
            },
            ("match", [subject, pattern]) => {
                Self::regex_test(subject, pattern, current, root, |p| format!("^(?:{p})$"))
            }
            ("search", [subject, pattern]) => {
                Self::regex_test(subject, pattern, current, root, |p| p.to_string())
            }
            _ => None,
        }
    }

    fn regex_test(
        subject: &ValueExpression,
        pattern: &ValueExpression,
        current: &Value,
        root: &Value,
        anchor: impl Fn(&str) -> String,
    ) -> Option<Value> {
        let subject = Self::eval_value_expr(subject, current, root);
        let pattern = Self::eval_value_expr(pattern, current, root);
        let matched = match (subject, pattern) {
            (Some(Value::String(s)), Some(Value::String(p))) => {
                Regex::new(&anchor(&p)).map(|re| re.is_match(&s)).unwrap_or(false)
            }
            _ => false,
        };
        Some(Value::Bool(matched))
    }

    fn compare(operator: &ComparisonOperator, left: &Option<Value>, right: &Option<Value>) -> bool {
        let equal = match (left, right) {
            (None, None) => true,
            (Some(l), Some(r)) => Self::values_equal(l, r),
            _ => false,
        };
        let ord = match (left, right) {
            (Some(l), Some(r)) => Self::compare_values(l, r),
            _ => None,
        };
        match operator {
            ComparisonOperator::Equal => equal,
            ComparisonOperator::NotEqual => !equal,
            ComparisonOperator::Less => ord == Some(Ordering::Less),
            ComparisonOperator::LessEqual => equal || ord == Some(Ordering::Less),
            ComparisonOperator::Greater => ord == Some(Ordering::Greater),
            ComparisonOperator::GreaterEqual => equal || ord == Some(Ordering::Greater),
        }
    }

    /// Structural equality where numbers compare by value, so that a literal
    /// `1.0` equals the document's integer `1`.
    fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(_), Value::Number(_)) => {
                Self::compare_values(a, b) == Some(Ordering::Equal)
            }
            (Value::Array(x), Value::Array(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(l, r)| Self::values_equal(l, r))
            }
            (Value::Object(x), Value::Object(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(k, l)| y.get(k).is_some_and(|r| Self::values_equal(l, r)))
            }
            _ => a == b,
        }
    }

    fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn push(path: &[PathComponent], component: PathComponent) -> Vec<PathComponent> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(component);
    out
}

/// Truthiness of a function result used directly as a test: `0`, `""`,
/// `false` and `null` fail.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn normalize_index(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let idx = if index < 0 { len + index } else { index };
    (0..len).contains(&idx).then_some(idx as usize)
}

/// Indices selected by `[start:end:step]` on an array of `len` elements,
/// in selection order (RFC 9535 §2.3.4.2.2).
///
/// Bounds and step may be any `isize`; stepping past the end of the range
/// stops the walk instead of overflowing.
fn slice_indices(
    len: usize,
    start: Option<isize>,
    end: Option<isize>,
    step: Option<isize>,
) -> Vec<usize> {
    let len = len as isize;
    let step = step.unwrap_or(1);
    let normalize = |i: isize| if i >= 0 { i } else { len + i };
    let mut out = Vec::new();

    if step > 0 {
        let lower = normalize(start.unwrap_or(0)).clamp(0, len);
        let upper = normalize(end.unwrap_or(len)).clamp(0, len);
        let mut next = Some(lower);
        while let Some(i) = next.filter(|i| *i < upper) {
            out.push(i as usize);
            next = i.checked_add(step);
        }
    } else if step < 0 {
        let upper = start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
        let lower = end.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
        let mut next = Some(upper);
        while let Some(i) = next.filter(|i| lower < *i) {
            out.push(i as usize);
            next = i.checked_add(step);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_forward_and_backward() {
        assert_eq!(slice_indices(7, Some(1), Some(5), Some(2)), vec![1, 3]);
        assert_eq!(slice_indices(7, Some(5), Some(1), Some(-2)), vec![5, 3]);
        assert_eq!(slice_indices(4, None, None, Some(-1)), vec![3, 2, 1, 0]);
        assert_eq!(slice_indices(4, Some(-2), None, None), vec![2, 3]);
        assert!(slice_indices(4, Some(1), Some(3), Some(0)).is_empty());
        assert!(slice_indices(0, None, None, Some(-1)).is_empty());
    }

    #[test]
    fn slice_with_extreme_bounds_and_steps() {
        assert_eq!(slice_indices(3, Some(1), None, Some(isize::MAX)), vec![1]);
        assert_eq!(slice_indices(3, Some(2), None, Some(isize::MAX - 1)), vec![2]);
        assert_eq!(slice_indices(7, None, None, Some(isize::MIN)), vec![6]);
        assert_eq!(slice_indices(3, Some(isize::MIN), Some(isize::MAX), None), vec![0, 1, 2]);
        assert_eq!(
            slice_indices(3, Some(isize::MAX), Some(isize::MIN), Some(-1)),
            vec![2, 1, 0]
        );
        assert!(slice_indices(3, Some(isize::MAX), None, Some(1)).is_empty());
    }

    #[test]
    fn index_normalization() {
        assert_eq!(normalize_index(isize::MIN, 3), None);
        assert_eq!(normalize_index(isize::MAX, 3), None);
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
    }

    #[test]
    fn nothing_compares_equal_to_nothing() {
        assert!(JsonPathEval::compare(&ComparisonOperator::Equal, &None, &None));
        assert!(JsonPathEval::compare(&ComparisonOperator::LessEqual, &None, &None));
        assert!(!JsonPathEval::compare(&ComparisonOperator::Less, &None, &None));
        assert!(!JsonPathEval::compare(&ComparisonOperator::Equal, &None, &Some(Value::Null)));
    }
}
