//! CLI output formatting for ordered maps.
//!
//! The CLI prints maps either as pretty JSON (the default, round-trips into
//! the next command) or, with `--lines`, as one `key => value` line per entry
//! so a reordering is readable at a glance:
//!
//! ```text
//! featured => true
//! 3 => Mountains
//! meta =>
//!     width => 800
//!     tags => ["dawn","sea"]
//! title =>
//! ```
//!
//! Nested objects are expanded one level deeper per nesting, four spaces per
//! level. Strings print without quotes, `null` prints as nothing, arrays print
//! as compact JSON.
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::ordered::OrderedMap;
use serde_json::Value;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Render a leaf value for a `key => value` line.
fn leaf(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_entry(key: &str, value: &Value, depth: usize, lines: &mut Vec<String>) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            lines.push(format!("{}{key} =>", indent(depth)));
            for (k, v) in fields {
                push_entry(k, v, depth + 1, lines);
            }
        }
        _ => {
            let rendered = leaf(value);
            if rendered.is_empty() {
                lines.push(format!("{}{key} =>", indent(depth)));
            } else {
                lines.push(format!("{}{key} => {rendered}", indent(depth)));
            }
        }
    }
}

/// Format a map as `key => value` lines in map order.
pub fn format_map(map: &OrderedMap<Value>) -> Vec<String> {
    let mut lines = Vec::with_capacity(map.len());
    for (key, value) in map {
        push_entry(&key.as_text(), value, 0, &mut lines);
    }
    lines
}

pub fn print_map(map: &OrderedMap<Value>) {
    for line in format_map(map) {
        println!("{}", line);
    }
}

/// Format a reordering summary for stderr-style diagnostics.
///
/// ```text
/// 4 entries: b, a, c, d
/// ```
pub fn format_key_summary<V>(map: &OrderedMap<V>) -> String {
    let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
    let noun = if map.len() == 1 { "entry" } else { "entries" };
    format!("{} {noun}: {}", map.len(), keys.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_from(value: Value) -> OrderedMap<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn format_map_flat_entries() {
        let map = map_from(json!({"title": "Dawn", "width": 800, "draft": false}));
        assert_eq!(
            format_map(&map),
            ["title => Dawn", "width => 800", "draft => false"]
        );
    }

    #[test]
    fn format_map_null_prints_nothing_after_arrow() {
        let map = map_from(json!({"alt": null}));
        assert_eq!(format_map(&map), ["alt =>"]);
    }

    #[test]
    fn format_map_nested_objects_indent() {
        let map = map_from(json!({"meta": {"width": 800, "tags": ["dawn", "sea"]}, "id": 3}));
        assert_eq!(
            format_map(&map),
            [
                "meta =>",
                "    width => 800",
                "    tags => [\"dawn\",\"sea\"]",
                "id => 3",
            ]
        );
    }

    #[test]
    fn format_map_empty_object_is_compact() {
        let map = map_from(json!({"extra": {}}));
        assert_eq!(format_map(&map), ["extra => {}"]);
    }

    #[test]
    fn format_map_follows_map_order() {
        let mut map = map_from(json!({"a": 1, "b": 2, "c": 3}));
        map.move_to_front("c");
        assert_eq!(format_map(&map), ["c => 3", "a => 1", "b => 2"]);
    }

    #[test]
    fn format_map_integer_keys() {
        let map = map_from(json!({"10": "x", "name": "y"}));
        assert_eq!(format_map(&map), ["10 => x", "name => y"]);
    }

    #[test]
    fn format_map_empty() {
        assert!(format_map(&OrderedMap::new()).is_empty());
    }

    #[test]
    fn format_key_summary_counts_entries() {
        let map = map_from(json!({"b": 1, "a": 2}));
        assert_eq!(format_key_summary(&map), "2 entries: b, a");
        let single = map_from(json!({"x": 1}));
        assert_eq!(format_key_summary(&single), "1 entry: x");
    }
}
