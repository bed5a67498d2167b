//! JSONPath types based on RFC 9535.

use serde_json::Value;

/// Selector types for JSONPath.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Named selector for property access: `.name`, `['key']`, `[key]`
    Name(String),
    /// Index selector for array element access: `[0]`, `[-1]`
    Index(isize),
    /// Slice selector for array slicing: `[start:end:step]`
    Slice { start: Option<isize>, end: Option<isize>, step: Option<isize> },
    /// Wildcard selector for selecting all elements: `.*`, `[*]`
    Wildcard,
    /// Filter expression for conditional selection: `[?(@.price < 10)]`
    Filter(FilterExpression),
}

/// Path segment containing one or more selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Selectors in this segment.
    pub selectors: Vec<Selector>,
    /// Whether this is a recursive descent segment (`..`).
    pub recursive: bool,
}

impl PathSegment {
    pub fn new(selectors: Vec<Selector>, recursive: bool) -> Self {
        Self {
            selectors,
            recursive,
        }
    }

    /// Returns the property name when this segment is a plain child
    /// access with exactly one name selector.
    pub fn as_single_name(&self) -> Option<&str> {
        match (self.recursive, self.selectors.as_slice()) {
            (false, [Selector::Name(name)]) => Some(name),
            _ => None,
        }
    }

    /// Returns the index when this segment is a plain child access with
    /// exactly one index selector.
    pub fn as_single_index(&self) -> Option<isize> {
        match (self.recursive, self.selectors.as_slice()) {
            (false, [Selector::Index(index)]) => Some(*index),
            _ => None,
        }
    }
}

/// Complete JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct JSONPath {
    /// Path segments.
    pub segments: Vec<PathSegment>,
}

impl JSONPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

/// Filter expression types.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// Comparison expression: `@.price < 10`
    Comparison {
        operator: ComparisonOperator,
        left: ValueExpression,
        right: ValueExpression,
    },
    /// Logical expression: `@.a && @.b`
    Logical {
        operator: LogicalOperator,
        left: Box<FilterExpression>,
        right: Box<FilterExpression>,
    },
    /// Existence test: `@.name`, `$.flag`
    Existence { path: JSONPath, from_root: bool },
    /// Function call used as a test: `match(@.name, 'a.*')`
    Function { name: String, args: Vec<ValueExpression> },
    /// Parenthesized expression: `(@.a || @.b)`
    Paren(Box<FilterExpression>),
    /// Negation: `!@.flag`
    Negation(Box<FilterExpression>),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And, // &&
    Or,  // ||
}

/// Value expressions in filters.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpression {
    /// Current node: `@`
    Current,
    /// Root node: `$`
    Root,
    /// Literal value: `"string"`, `42`, `true`, `null`
    Literal(Value),
    /// Query relative to the current node: `@.name`
    Path(JSONPath),
    /// Query relative to the document root: `$.limits.max`
    RootPath(JSONPath),
    /// Function call: `length(@)`
    Function { name: String, args: Vec<ValueExpression> },
}

/// A component of a normalized path.
///
/// The derived ordering compares indices numerically, which is what
/// callers rely on when they sort routes before editing arrays.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathComponent {
    Index(usize),
    Key(String),
}

/// A node selected by a query, together with the route that leads to it
/// from the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPathNode<'a> {
    /// The matched value.
    pub value: &'a Value,
    /// Steps from the root to `value`; empty for the root itself.
    pub path: Vec<PathComponent>,
}
