//! JSONPath (RFC 9535) parsing and evaluation with match locations.
//!
//! Every match is reported together with its normalized path (the route of
//! object keys and array indices from the document root), which is what an
//! editor needs to find the same slot again in a copy of the document.
//!
//! # Example
//!
//! ```
//! use json_edit_path::{normalized_path, JsonPathEval, JsonPathParser};
//! use serde_json::json;
//!
//! let path = JsonPathParser::parse("$.store.books[?(@.price < 10)].title").unwrap();
//!
//! let doc = json!({
//!     "store": {
//!         "books": [
//!             {"title": "Sayings of the Century", "price": 8.95},
//!             {"title": "Sword of Honour", "price": 12.99}
//!         ]
//!     }
//! });
//!
//! let nodes = JsonPathEval::eval_nodes(&path, &doc);
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].value, &json!("Sayings of the Century"));
//! assert_eq!(normalized_path(&nodes[0].path), "$['store']['books'][0]['title']");
//! ```

mod types;
pub use types::*;

mod parser;
pub use parser::{JsonPathParser, ParseError, SpannedPath};

mod eval;
pub use eval::JsonPathEval;

mod util;
pub use util::{json_pointer, normalized_path};
