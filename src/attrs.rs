//! HTML attribute rendering.
//!
//! Attribute maps are [`OrderedMap<String>`]s so callers can reorder or
//! splice attributes before rendering (e.g. put `class` first, or insert a
//! `data-*` attribute right after `id`). Rendering keeps that order.
//!
//! Output format is `name='value' ` per attribute, trailing space included,
//! which is what the SVG and `<style>` builders splice after a tag name.
//! Values are escaped with [`maud::Escaper`].

use crate::ordered::OrderedMap;
use maud::Escaper;
use std::fmt::Write;

/// Render attributes as `name='value' ` pairs in map order.
pub fn render(attributes: &OrderedMap<String>) -> String {
    let mut out = String::new();
    for (name, value) in attributes {
        out.push_str(&name.as_text());
        out.push_str("='");
        // Writing into a String cannot fail.
        let _ = Escaper::new(&mut out).write_str(value);
        out.push_str("' ");
    }
    out
}
