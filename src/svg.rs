//! SVG injection: inline markup with extra attributes and colour swaps, and
//! sprite `<use>` references with optional lazy loading.
//!
//! ## Inline SVG
//!
//! The first `<svg ` in the markup becomes `<svg {attributes}`, then each
//! colour replacement is applied in order across the whole markup:
//!
//! ```text
//! <svg viewBox="0 0 24 24"><path fill="#000"/></svg>
//!   + {class: "icon"}, {"#000": "currentColor"}
//! → <svg class='icon' viewBox="0 0 24 24"><path fill="currentColor"/></svg>
//! ```
//!
//! ## Sprites
//!
//! ```text
//! eager: <svg width='16' ><use xlink:href='/icons.svg#close'/></svg>
//! lazy:  <svg width='16' data-lazy='/icons.svg#close' ><use xlink:href='http://www.w3.org/1999/xlink'/></svg>
//! ```
//!
//! Lazy sprites are turned back into eager ones when the request URI carries
//! the configured `lazy_disabled_marker`.

use crate::attrs;
use crate::config::SvgConfig;
use crate::env::RequestContext;
use crate::ordered::OrderedMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No inline SVG '{name}' in group '{group}'")]
    UnknownInline { group: String, name: String },
    #[error("No sprite sheet named '{0}'")]
    UnknownSprite(String),
}

/// Colour replacements applied to inline markup, in order.
pub type Colors = OrderedMap<String>;

/// Configured inline SVGs and sprite sheets.
#[derive(Debug, Clone, Default)]
pub struct SvgLibrary {
    config: SvgConfig,
}

impl SvgLibrary {
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }

    /// Read SVG markup from `path` and inject attributes and colours.
    pub fn inject_file(
        &self,
        path: &Path,
        attributes: &OrderedMap<String>,
        colors: &Colors,
    ) -> Result<String, SvgError> {
        let markup = fs::read_to_string(path)?;
        Ok(inject(&markup, attributes, colors))
    }

    /// Render a configured inline SVG from `group`.
    pub fn render_inline(
        &self,
        name: &str,
        group: &str,
        attributes: &OrderedMap<String>,
        colors: &Colors,
    ) -> Result<String, SvgError> {
        let markup = self
            .config
            .inline
            .get(group)
            .and_then(|svgs| svgs.get(name))
            .ok_or_else(|| {
                tracing::warn!(group, name, "inline SVG not configured");
                SvgError::UnknownInline {
                    group: group.to_string(),
                    name: name.to_string(),
                }
            })?;
        Ok(inject(markup, attributes, colors))
    }

    /// Render an `<svg><use/></svg>` reference to `id` in sprite sheet `sprite`.
    ///
    /// With `lazy`, the sprite URL moves into the lazy attribute (set at its
    /// existing position if the caller already passed one, appended
    /// otherwise) and `xlink:href` points at the XLink namespace. The
    /// request context can veto lazy loading.
    pub fn render_sprite(
        &self,
        sprite: &str,
        id: &str,
        attributes: &OrderedMap<String>,
        lazy: bool,
        ctx: &RequestContext,
    ) -> Result<String, SvgError> {
        let sheet = self.config.sprites.get(sprite).ok_or_else(|| {
            tracing::warn!(sprite, "sprite sheet not configured");
            SvgError::UnknownSprite(sprite.to_string())
        })?;
        let target = format!("{sheet}#{id}");

        let mut attributes = attributes.clone();
        let href = if !lazy || self.lazy_disabled(ctx) {
            target
        } else {
            attributes.insert(self.config.lazy_attribute.as_str(), target);
            XLINK_NAMESPACE.to_string()
        };

        Ok(format!(
            "<svg {}><use xlink:href='{href}'/></svg>",
            attrs::render(&attributes)
        ))
    }

    fn lazy_disabled(&self, ctx: &RequestContext) -> bool {
        ctx.uri_contains(&self.config.lazy_disabled_marker)
    }
}

/// Add attributes after the first `<svg ` and apply colour swaps in order.
pub fn inject(markup: &str, attributes: &OrderedMap<String>, colors: &Colors) -> String {
    let opening = format!("<svg {}", attrs::render(attributes));
    let mut svg = markup.replacen("<svg ", &opening, 1);
    for (from, to) in colors {
        let from = from.as_text();
        if !from.is_empty() {
            svg = svg.replace(&*from, to);
        }
    }
    svg
}
