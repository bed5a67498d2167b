//! Path-addressed edits of JSON documents.
//!
//! Nodes are addressed with JSONPath expressions (see [`json_edit_path`]).
//! Every operation takes the document by reference and returns a modified
//! copy; the input is never changed, and a failed operation produces no
//! document at all.
//!
//! ```
//! use json_edit::{append_to_array, delete_at_path, search, set_at_path};
//! use serde_json::json;
//!
//! let doc = json!({"items": ["apple", "banana"], "meta": {"fruit": "apple"}});
//!
//! let hits = search(&doc, "apple");
//! assert_eq!(hits[0].path, "$.items[0]");
//! assert_eq!(hits[1].path, "$.meta.fruit");
//!
//! let doc = append_to_array(&doc, "$.items", json!("cherry")).unwrap();
//! let doc = delete_at_path(&doc, "$.items[0]").unwrap();
//! let doc = set_at_path(&doc, "$.meta.count", json!(2), false).unwrap();
//! assert_eq!(
//!     doc,
//!     json!({"items": ["banana", "cherry"], "meta": {"fruit": "apple", "count": 2}})
//! );
//! ```

mod document;
mod edit;
mod error;
mod location;
mod resolve;
mod search;
pub mod value;

pub use document::Document;
pub use edit::{append_to_array, delete_at_path, replace, set_at_path, Edit};
pub use error::{EditError, ErrorKind};
pub use json_edit_path::{ParseError, PathComponent};
pub use location::{Location, LocationRecord};
pub use resolve::{query, resolve, CompiledPath};
pub use search::{search, SearchHit};
