//! CSS rule rendering and inline `<style>` tags.
//!
//! Rules are data, not strings: a selector plus an ordered declaration map.
//! Keeping declarations in an [`OrderedMap`] lets callers splice a new
//! declaration right after an existing one (a fallback `font-family` after
//! the primary one, say) before rendering.
//!
//! ```text
//! [{ selector: "@font-face",
//!    declarations: { font-family: "Inter",
//!                    src: { woff2: "/inter.woff2", woff: "/inter.woff" } } }]
//!
//! → @font-face {font-family: Inter;src: url('/inter.woff2') format('woff2'),url('/inter.woff') format('woff');}
//! ```
//!
//! Output is minified, one line per stylesheet.

use crate::attrs;
use crate::ordered::OrderedMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CssError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSS declaration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Declaration {
    /// A plain value: `color: red`.
    Value(String),
    /// A `format → url` list, rendered only for the `src` property.
    Sources(OrderedMap<String>),
}

impl From<&str> for Declaration {
    fn from(value: &str) -> Self {
        Declaration::Value(value.to_string())
    }
}

impl From<String> for Declaration {
    fn from(value: String) -> Self {
        Declaration::Value(value)
    }
}

/// A selector and its declarations, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    #[serde(default)]
    pub declarations: OrderedMap<Declaration>,
}

impl CssRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: OrderedMap::new(),
        }
    }

    /// Builder-style declaration insert. Re-declaring a property overwrites
    /// it in place.
    pub fn declare(mut self, property: &str, value: impl Into<Declaration>) -> Self {
        self.declarations.insert(property, value.into());
        self
    }
}

/// Render rules to a minified stylesheet.
///
/// Source lists on any property other than `src` are dropped.
pub fn render(rules: &[CssRule]) -> String {
    let mut css = String::new();
    for rule in rules {
        css.push_str(&rule.selector);
        css.push_str(" {");
        for (property, value) in &rule.declarations {
            match value {
                Declaration::Value(v) => {
                    css.push_str(&format!("{property}: {v};"));
                }
                Declaration::Sources(sources) if property.as_text() == "src" => {
                    let list: Vec<String> = sources
                        .iter()
                        .map(|(format, url)| format!("url('{url}') format('{format}')"))
                        .collect();
                    css.push_str("src: ");
                    css.push_str(&list.join(","));
                    css.push(';');
                }
                Declaration::Sources(_) => {
                    tracing::debug!(%property, selector = %rule.selector, "source list outside `src`, skipped");
                }
            }
        }
        css.push('}');
    }
    css
}

/// Wrap `css` in a `<style>` tag with the given attributes.
///
/// Returns `None` for empty CSS so callers don't emit empty tags.
pub fn inline_style(css: &str, attributes: &OrderedMap<String>) -> Option<String> {
    if css.is_empty() {
        return None;
    }
    Some(format!(
        "\n<style {attrs}>{css}</style>\n",
        attrs = attrs::render(attributes)
    ))
}

/// Read a stylesheet from disk and wrap it like [`inline_style`].
pub fn inline_style_file(
    path: &Path,
    attributes: &OrderedMap<String>,
) -> Result<Option<String>, CssError> {
    let css = fs::read_to_string(path)?;
    Ok(inline_style(&css, attributes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{attr_map, temp_file};

    fn font_face() -> CssRule {
        let sources: OrderedMap<String> = [
            ("woff2", "/inter.woff2".to_string()),
            ("woff", "/inter.woff".to_string()),
        ]
        .into_iter()
        .collect();
        CssRule::new("@font-face")
            .declare("font-family", "Inter")
            .declare("src", Declaration::Sources(sources))
    }

    // =========================================================================
    // render() tests
    // =========================================================================

    #[test]
    fn render_plain_declarations() {
        let rule = CssRule::new(".a").declare("color", "red").declare("margin", "0");
        assert_eq!(render(&[rule]), ".a {color: red;margin: 0;}");
    }

    #[test]
    fn render_font_sources() {
        assert_eq!(
            render(&[font_face()]),
            "@font-face {font-family: Inter;src: url('/inter.woff2') format('woff2'),url('/inter.woff') format('woff');}"
        );
    }

    #[test]
    fn render_drops_source_lists_on_other_properties() {
        let sources: OrderedMap<String> = [("a", "b".to_string())].into_iter().collect();
        let rule = CssRule::new("p")
            .declare("background", Declaration::Sources(sources))
            .declare("color", "blue");
        assert_eq!(render(&[rule]), "p {color: blue;}");
    }

    #[test]
    fn render_multiple_rules_and_empty_rule() {
        let rules = [CssRule::new("a").declare("x", "1"), CssRule::new("b")];
        assert_eq!(render(&rules), "a {x: 1;}b {}");
    }

    #[test]
    fn render_empty_rule_list() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn spliced_declaration_renders_after_anchor() {
        let mut rule = CssRule::new("body").declare("font-family", "Inter").declare("color", "#111");
        let fallback: OrderedMap<Declaration> =
            [("font-display", Declaration::from("swap"))].into_iter().collect();
        rule.declarations.insert_after("font-family", fallback);
        assert_eq!(
            render(&[rule]),
            "body {font-family: Inter;font-display: swap;color: #111;}"
        );
    }

    #[test]
    fn rules_deserialize_from_json() {
        let rules: Vec<CssRule> = serde_json::from_str(
            r#"[{"selector": "@font-face",
                 "declarations": {"font-family": "Inter",
                                  "src": {"woff2": "/inter.woff2", "woff": "/inter.woff"}}}]"#,
        )
        .unwrap();
        assert_eq!(rules, vec![font_face()]);
    }

    // =========================================================================
    // inline_style() tests
    // =========================================================================

    #[test]
    fn inline_style_wraps_css() {
        let attrs = attr_map(&[("id", "theme-inline")]);
        assert_eq!(
            inline_style("a{}", &attrs).as_deref(),
            Some("\n<style id='theme-inline' >a{}</style>\n")
        );
    }

    #[test]
    fn inline_style_empty_css_is_none() {
        assert_eq!(inline_style("", &OrderedMap::new()), None);
    }

    #[test]
    fn inline_style_file_reads_css() {
        let tmp = temp_file("critical.css", "body{margin:0}");
        let html = inline_style_file(&tmp.path().join("critical.css"), &OrderedMap::new()).unwrap();
        assert_eq!(html.as_deref(), Some("\n<style >body{margin:0}</style>\n"));
    }

    #[test]
    fn inline_style_file_missing_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = inline_style_file(&tmp.path().join("nope.css"), &OrderedMap::new());
        assert!(matches!(result, Err(CssError::Io(_))));
    }
}
