//! Rendering of normalized paths.

use crate::types::PathComponent;

/// Format a route as an RFC 9535 normalized path, e.g. `$['store']['book'][0]`.
pub fn normalized_path(path: &[PathComponent]) -> String {
    let mut out = String::from("$");
    for component in path {
        match component {
            PathComponent::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            PathComponent::Key(key) => {
                out.push_str("['");
                out.push_str(&escape_single_quoted(key));
                out.push_str("']");
            }
        }
    }
    out
}

/// Format a route as an RFC 6901 JSON Pointer, e.g. `/store/book/0`.
///
/// The root route formats as the empty string.
pub fn json_pointer(path: &[PathComponent]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        match component {
            PathComponent::Index(index) => out.push_str(&index.to_string()),
            PathComponent::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
        }
    }
    out
}

fn escape_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out
}
