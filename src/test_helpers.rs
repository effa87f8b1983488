//! Shared test utilities for the themekit test suite.
//!
//! Builders for small maps and extractors that flatten a map into something
//! `assert_eq!` can compare against a literal.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut map = str_map(&[("a", "1"), ("b", "2")]);
//! map.move_to_front("b");
//! assert_eq!(keys_of(&map), ["b", "a"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::ordered::OrderedMap;

// =========================================================================
// Builders
// =========================================================================

/// Build a map of string keys to string values, in the given order.
pub fn str_map(entries: &[(&str, &'static str)]) -> OrderedMap<&'static str> {
    entries.iter().map(|(k, v)| (*k, *v)).collect()
}

/// Build an attribute map with owned values.
pub fn attr_map(entries: &[(&str, &str)]) -> OrderedMap<String> {
    entries.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

/// Write `contents` to `name` inside a fresh temp dir and return the dir.
pub fn temp_file(name: &str, contents: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    tmp
}

/// Whether `dir/name` exists. Keeps fixture assertions readable.
pub fn exists(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}

// =========================================================================
// Extractors
// =========================================================================

/// All keys in map order, as text.
pub fn keys_of<V>(map: &OrderedMap<V>) -> Vec<String> {
    map.keys().map(|k| k.to_string()).collect()
}

/// All `(key, value)` pairs in map order, as text.
pub fn pairs_of<V: ToString>(map: &OrderedMap<V>) -> Vec<(String, String)> {
    map.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
