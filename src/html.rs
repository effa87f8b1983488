//! Regex-based HTML helpers.
//!
//! These work on markup fragments as strings: pull `<img>` tags and their
//! `src`/`width`/`height` out of post content, prepend a class or inline
//! style to a tag, and strip markup down to plain-text excerpts. No DOM is
//! built; the patterns match what theme templates emit, not arbitrary HTML.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\s+.*?>").expect("valid img regex"));
static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).expect("valid src regex"));
static WIDTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"width="([^"]+)""#).expect("valid width regex"));
static HEIGHT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"height="([^"]+)""#).expect("valid height regex"));

static HAS_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)class=["']"#).expect("valid class regex"));
static CLASS_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)class=(["'])(.*?)["']"#).expect("valid class regex"));
static HAS_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)style=["']"#).expect("valid style regex"));
static STYLE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)style=(["'])(.*?)["']"#).expect("valid style regex"));

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[/?[A-Za-z][\w-]*(?:\s[^\]]*)?/?\]").expect("valid shortcode regex")
});
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script>").expect("valid script regex"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style>").expect("valid style regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// All `<img ...>` tags in `html`, in document order.
pub fn extract_images(html: &str) -> Vec<&str> {
    IMG_TAG.find_iter(html).map(|m| m.as_str()).collect()
}

/// The first `<img ...>` tag in `html`.
pub fn extract_image(html: &str) -> Option<&str> {
    IMG_TAG.find(html).map(|m| m.as_str())
}

/// Value of the first double-quoted `src` attribute.
pub fn extract_image_src(html: &str) -> Option<&str> {
    first_capture(&SRC_ATTR, html)
}

/// Value of the first double-quoted `width` attribute.
pub fn extract_width(html: &str) -> Option<&str> {
    first_capture(&WIDTH_ATTR, html)
}

/// Value of the first double-quoted `height` attribute.
pub fn extract_height(html: &str) -> Option<&str> {
    first_capture(&HEIGHT_ATTR, html)
}

fn first_capture<'h>(re: &Regex, html: &'h str) -> Option<&'h str> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Prepend `class` to the markup's class list.
///
/// When `html` already carries a `class=` attribute the class is added in
/// front of every existing class value, keeping its quote style. Otherwise
/// every `<tag` opening gets a new `class="..."` attribute.
///
/// `tag` is matched as a prefix of the element name, so `a` also hits
/// `<abbr` and `<article`. Pass markup holding a single element.
pub fn add_html_class(html: &str, tag: &str, class: &str) -> String {
    prepend_attribute(html, tag, "class", class, &HAS_CLASS, &CLASS_VALUE)
}

/// Prepend `css` to the markup's inline style, same rules as
/// [`add_html_class`].
pub fn add_css(html: &str, tag: &str, css: &str) -> String {
    prepend_attribute(html, tag, "style", css, &HAS_STYLE, &STYLE_VALUE)
}

fn prepend_attribute(
    html: &str,
    tag: &str,
    attribute: &str,
    addition: &str,
    present: &Regex,
    value: &Regex,
) -> String {
    if present.is_match(html) {
        return value
            .replace_all(html, |caps: &Captures| {
                format!("{attribute}={q}{addition} {existing}{q}", q = &caps[1], existing = &caps[2])
            })
            .into_owned();
    }

    let opening =
        Regex::new(&format!("(?i)<{}", regex::escape(tag))).expect("escaped tag is a valid regex");
    opening
        .replace_all(html, |_: &Captures| format!("<{tag} {attribute}=\"{addition}\""))
        .into_owned()
}

/// Word limit for [`clean`] excerpts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Maximum number of words kept.
    pub words: usize,
    /// Appended when the text was cut.
    pub more: String,
}

impl Default for Excerpt {
    fn default() -> Self {
        Self {
            words: 55,
            more: "...".to_string(),
        }
    }
}

/// Strip shortcodes, scripts, styles and tags from `html`.
///
/// With an `excerpt`, whitespace is collapsed and the text is cut to the
/// word limit, with `excerpt.more` appended when anything was dropped.
pub fn clean(html: &str, excerpt: Option<&Excerpt>) -> String {
    let text = SHORTCODE.replace_all(html, "");
    let text = SCRIPT_BLOCK.replace_all(&text, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = TAG.replace_all(&text, "");
    let text = text.trim();

    match excerpt {
        Some(excerpt) => trim_words(text, excerpt),
        None => text.to_string(),
    }
}

fn trim_words(text: &str, excerpt: &Excerpt) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > excerpt.words {
        format!("{}{}", words[..excerpt.words].join(" "), excerpt.more)
    } else {
        words.join(" ")
    }
}
