//! Error types for path resolution and edits.

use json_edit_path::ParseError;
use thiserror::Error;

/// Failure of a query or edit. Every edit is all-or-nothing: when one of
/// these is returned, no document was produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    /// The path expression does not parse.
    #[error("invalid path `{path}`: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: ParseError,
    },
    /// `set` found no match and the final segment is not a single property
    /// access, so there is nothing it may safely create.
    #[error("invalid path `{path}`: only a trailing property access can be created")]
    NotCreatable { path: String },
    /// `set` needs a parent that does not exist; intermediate containers are
    /// never created.
    #[error("parent `{parent}` of `{path}` does not exist")]
    ParentNotFound { path: String, parent: String },
    /// `set` found a parent that cannot take the new member. `parent` is the
    /// normalized path of that node and `pointer` its JSON Pointer.
    #[error(
        "cannot create `{path}`: parent {parent} is {found}; \
         only a named property of an object can be created"
    )]
    InvalidTarget {
        path: String,
        parent: String,
        pointer: String,
        found: &'static str,
    },
    /// `append` matched a node that is not an array.
    #[error("cannot append via `{path}`: {location} is {found}, not an array")]
    TypeMismatch {
        path: String,
        location: String,
        pointer: String,
        found: &'static str,
    },
}

/// Coarse classification of an [`EditError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    ParentNotFound,
    InvalidTarget,
    TypeMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPath => "INVALID_PATH",
            ErrorKind::ParentNotFound => "PARENT_NOT_FOUND",
            ErrorKind::InvalidTarget => "INVALID_TARGET",
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
        }
    }
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::InvalidPath { .. } | EditError::NotCreatable { .. } => {
                ErrorKind::InvalidPath
            }
            EditError::ParentNotFound { .. } => ErrorKind::ParentNotFound,
            EditError::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            EditError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// The path expression the failing request was made with.
    pub fn path(&self) -> &str {
        match self {
            EditError::InvalidPath { path, .. }
            | EditError::NotCreatable { path }
            | EditError::ParentNotFound { path, .. }
            | EditError::InvalidTarget { path, .. }
            | EditError::TypeMismatch { path, .. } => path,
        }
    }

    /// JSON Pointer to the node that made the edit fail, when there is one.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            EditError::InvalidTarget { pointer, .. } | EditError::TypeMismatch { pointer, .. } => {
                Some(pointer)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = EditError::TypeMismatch {
            path: "$.a".into(),
            location: "$['a']".into(),
            pointer: "/a".into(),
            found: "a number",
        };
        assert_eq!(err.to_string(), "cannot append via `$.a`: $['a'] is a number, not an array");
        assert_eq!(err.kind().as_str(), "TYPE_MISMATCH");
        assert_eq!(err.path(), "$.a");
        assert_eq!(err.pointer(), Some("/a"));
    }

    #[test]
    fn not_creatable_is_an_invalid_path() {
        let err = EditError::NotCreatable {
            path: "$.a[*]".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert_eq!(err.pointer(), None);
    }
}
