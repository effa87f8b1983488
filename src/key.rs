//! Map keys and the coercion rules that produce them.
//!
//! An [`OrderedMap`](crate::ordered::OrderedMap) is keyed by either an integer
//! or a string, never both for the same logical key. Raw input values arrive
//! as a [`Scalar`] and are converted exactly once by [`to_key`]; every later
//! comparison is type-strict.
//!
//! ## Coercion rules
//!
//! | Input | Key |
//! |---|---|
//! | `7`, `-3` | `Int` |
//! | `"7"`, `"-3"`, `"0"` | `Int` (canonical decimal integers only) |
//! | `"07"`, `"-0"`, `" 7"`, `"1.5"`, `"abc"` | `Str` |
//! | `true` / `false` | `Int(1)` / `Int(0)` |
//! | `null` | `Str("")` |
//! | `2.9`, `-2.9` | `Int(2)`, `Int(-2)` (truncated) |
//! | `NaN`, `inf`, out-of-range floats | `Str("")` |

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A map key: integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// String form of the key (integers rendered in decimal).
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Key::Int(i) => Cow::Owned(i.to_string()),
            Key::Str(s) => Cow::Borrowed(s),
        }
    }

    /// Whether the key reads as a number.
    ///
    /// Integer keys always do. String keys do when they hold a decimal or
    /// exponent literal that was not canonical enough to become an `Int`,
    /// e.g. `"1.5"`, `"1e3"` or `" 42"`.
    pub fn is_numeric(&self) -> bool {
        match self {
            Key::Int(_) => true,
            Key::Str(s) => looks_numeric(s),
        }
    }

    /// Whether `value` equals this key for the purposes of a value search.
    ///
    /// Strings compare through their coerced key form, so `"3"` matches
    /// `Int(3)`. Floats only match when integral. Booleans and null never
    /// match anything.
    pub fn matches_value(&self, value: &Scalar) -> bool {
        match value {
            Scalar::Str(s) => to_key(s.as_str()) == *self,
            Scalar::Int(i) => *self == Key::Int(*i),
            Scalar::Float(f) => f.fract() == 0.0 && to_key(*f) == *self,
            Scalar::Bool(_) | Scalar::Null => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

/// A raw scalar value, before coercion to a [`Key`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Text form used for substring searches.
    ///
    /// Only strings and numbers have one; booleans and null return `None`.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Scalar::Str(s) => Some(Cow::Borrowed(s)),
            Scalar::Int(i) => Some(Cow::Owned(i.to_string())),
            Scalar::Float(f) => Some(Cow::Owned(f.to_string())),
            Scalar::Bool(_) | Scalar::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Convert a raw value into the key a map would store it under.
///
/// Never fails: values with no integer or string reading become `Str("")`.
pub fn to_key(value: impl Into<Scalar>) -> Key {
    match value.into() {
        Scalar::Null => Key::Str(String::new()),
        Scalar::Bool(b) => Key::Int(i64::from(b)),
        Scalar::Int(i) => Key::Int(i),
        Scalar::Float(f) => float_key(f),
        Scalar::Str(s) => match canonical_int(&s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s),
        },
    }
}

fn float_key(f: f64) -> Key {
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Key::Int(truncated as i64)
    } else {
        Key::Str(String::new())
    }
}

/// Parse `s` as an integer only if it is written the way the integer itself
/// would print: no sign on zero, no leading zeros, no `+`, no whitespace.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == s.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical { s.parse().ok() } else { None }
}

/// Loose numeric-literal check: optional surrounding whitespace, optional
/// sign, digits with an optional fraction, optional exponent.
fn looks_numeric(s: &str) -> bool {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::Str(s.clone())
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<u64> for Scalar {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::Str(i.to_string()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<Key> for Scalar {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Scalar::Int(i),
            Key::Str(s) => Scalar::Str(s),
        }
    }
}

impl From<&Key> for Scalar {
    fn from(key: &Key) -> Self {
        key.clone().into()
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        to_key(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        to_key(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct KeyVisitor;

impl Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, integer, float, boolean or null key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Key, E> {
        Ok(to_key(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Key, E> {
        Ok(to_key(Scalar::Null))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // to_key() tests
    // =========================================================================

    #[test]
    fn integers_stay_integers() {
        assert_eq!(to_key(7), Key::Int(7));
        assert_eq!(to_key(-3), Key::Int(-3));
        assert_eq!(to_key(0), Key::Int(0));
    }

    #[test]
    fn canonical_numeric_strings_become_integers() {
        assert_eq!(to_key("7"), Key::Int(7));
        assert_eq!(to_key("-3"), Key::Int(-3));
        assert_eq!(to_key("0"), Key::Int(0));
        assert_eq!(to_key("9223372036854775807"), Key::Int(i64::MAX));
    }

    #[test]
    fn non_canonical_numeric_strings_stay_strings() {
        for s in ["07", "-0", " 7", "7 ", "+7", "1.5", "1e3", "", "-"] {
            assert_eq!(to_key(s), Key::Str(s.to_string()), "input {s:?}");
        }
    }

    #[test]
    fn integer_string_overflow_stays_string() {
        assert_eq!(
            to_key("9223372036854775808"),
            Key::Str("9223372036854775808".to_string())
        );
    }

    #[test]
    fn plain_strings_stay_strings() {
        assert_eq!(to_key("title"), Key::Str("title".to_string()));
    }

    #[test]
    fn booleans_become_zero_or_one() {
        assert_eq!(to_key(true), Key::Int(1));
        assert_eq!(to_key(false), Key::Int(0));
    }

    #[test]
    fn null_becomes_empty_string() {
        assert_eq!(to_key(Scalar::Null), Key::Str(String::new()));
        assert_eq!(to_key(None::<&str>), Key::Str(String::new()));
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(to_key(2.9), Key::Int(2));
        assert_eq!(to_key(-2.9), Key::Int(-2));
        assert_eq!(to_key(0.4), Key::Int(0));
    }

    #[test]
    fn unrepresentable_floats_become_empty_string() {
        assert_eq!(to_key(f64::NAN), Key::Str(String::new()));
        assert_eq!(to_key(f64::INFINITY), Key::Str(String::new()));
        assert_eq!(to_key(1e300), Key::Str(String::new()));
    }

    #[test]
    fn huge_unsigned_stays_string() {
        assert_eq!(to_key(u64::MAX), Key::Str(u64::MAX.to_string()));
    }

    // =========================================================================
    // Key helpers
    // =========================================================================

    #[test]
    fn is_numeric_for_int_and_numeric_looking_strings() {
        assert!(Key::Int(4).is_numeric());
        assert!(to_key("1.5").is_numeric());
        assert!(to_key("1e3").is_numeric());
        assert!(to_key(" 42").is_numeric());
        assert!(to_key(".5").is_numeric());
        assert!(!to_key("title").is_numeric());
        assert!(!to_key("").is_numeric());
        assert!(!to_key(".").is_numeric());
        assert!(!to_key("1e").is_numeric());
    }

    #[test]
    fn matches_value_coerces_strings() {
        assert!(Key::Int(3).matches_value(&Scalar::from("3")));
        assert!(Key::Int(3).matches_value(&Scalar::Int(3)));
        assert!(to_key("b").matches_value(&Scalar::from("b")));
        assert!(!to_key("b").matches_value(&Scalar::from("B")));
    }

    #[test]
    fn matches_value_rejects_bool_null_and_fractions() {
        assert!(!Key::Int(1).matches_value(&Scalar::Bool(true)));
        assert!(!to_key("").matches_value(&Scalar::Null));
        assert!(!Key::Int(1).matches_value(&Scalar::Float(1.5)));
        assert!(Key::Int(1).matches_value(&Scalar::Float(1.0)));
    }

    #[test]
    fn display_renders_both_kinds() {
        assert_eq!(Key::Int(12).to_string(), "12");
        assert_eq!(to_key("id").to_string(), "id");
    }

    #[test]
    fn scalar_text_only_for_strings_and_numbers() {
        assert_eq!(Scalar::from("a").text().as_deref(), Some("a"));
        assert_eq!(Scalar::Int(5).text().as_deref(), Some("5"));
        assert_eq!(Scalar::Bool(true).text(), None);
        assert_eq!(Scalar::Null.text(), None);
    }

    #[test]
    fn deserialize_coerces_json_keys() {
        let key: Key = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(key, Key::Int(12));
        let key: Key = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(key, to_key("x"));
        let key: Key = serde_json::from_str("null").unwrap();
        assert_eq!(key, Key::Str(String::new()));
    }
}
