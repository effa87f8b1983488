//! # Themekit
//!
//! Presentation-layer helpers for CMS themes. At the center is an
//! insertion-ordered key/value map with the reordering operations theme code
//! keeps needing: pull a few keys to the front, pull entries whose key or
//! value mentions a word to the front, splice a group of entries in before or
//! after an anchor key. Around it sit small helpers that build HTML
//! attributes, CSS, inline SVG and template paths out of those maps.
//!
//! ```text
//! {title, 3, featured, meta}
//!     move_many_to_front(["featured", 3])   → {featured, 3, title, meta}
//!     insert_after("title", {subtitle})     → {featured, 3, title, subtitle, meta}
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`key`] | `Key`/`Scalar` types and the scalar → key coercion every operation goes through |
//! | [`ordered`] | `OrderedMap`: front-moves, substring front-moves, anchored splices |
//! | [`attrs`] | Ordered map → `name='value' ` attribute string |
//! | [`html`] | Regex-based image extraction, class/attribute injection, excerpt cleanup |
//! | [`text`] | Prefix/suffix/substring tests over needle lists, URL check |
//! | [`css`] | CSS rule rendering, inline `<style>` tags |
//! | [`svg`] | Inline SVG injection and lazy sprite references |
//! | [`media`] | WebP renaming, aspect ratios, attachment lookup by URL |
//! | [`env`] | Request-context flags (frontend, admin, REST, CLI, cron) |
//! | [`templates`] | Template/component path layout and include-if-exists |
//! | [`config`] | `theme.toml` loading, stock defaults, merging, validation |
//! | [`output`] | CLI output formatting for maps |
//!
//! # Design Decisions
//!
//! ## Keys Are Coerced Once
//!
//! Keys are integers or strings. Anything a caller passes as a key (a bool,
//! a float, `"7"`) is coerced through [`to_key`] at the boundary, so `"7"`
//! and `7` name the same entry everywhere. After that the map only ever
//! compares [`Key`] values.
//!
//! ## Missing Keys Are Not Errors
//!
//! Every reordering skips keys it cannot find and leaves the map as it was.
//! Theme code builds these maps from user settings where absent entries are
//! normal, so the core has no error type. Skips are logged at `debug`.
//!
//! ## Mutation In Place
//!
//! Operations take `&mut self` and return `&mut Self` for chaining. The map
//! is backed by [`indexmap::IndexMap`], so lookups stay O(1) and moves are
//! index shifts rather than rebuilds.

pub mod attrs;
pub mod config;
pub mod css;
pub mod env;
pub mod html;
pub mod key;
pub mod media;
pub mod ordered;
pub mod output;
pub mod svg;
pub mod templates;
pub mod text;

pub use key::{Key, Scalar, to_key};
pub use ordered::{Anchor, OrderedMap, Placement, Searchable};

#[cfg(test)]
pub(crate) mod test_helpers;
