//! Order-preserving map and the reordering/splicing engine.
//!
//! [`OrderedMap`] wraps an [`IndexMap`] keyed by [`Key`]. Iteration order is
//! the observable property every operation is defined against, so equality
//! between two maps is order-sensitive (unlike `IndexMap`'s own `PartialEq`).
//!
//! ## Operations
//!
//! | Operation | Effect |
//! |---|---|
//! | [`key_offset`](OrderedMap::key_offset) | Position of a key, type-strict after coercion |
//! | [`value_offset`](OrderedMap::value_offset) | Position of the first value equal to a key |
//! | [`move_to_front`](OrderedMap::move_to_front) | One entry to position 0 |
//! | [`move_many_to_front`](OrderedMap::move_many_to_front) | Keys in turn, value search as fallback |
//! | [`move_matching_to_front`](OrderedMap::move_matching_to_front) | First substring match per needle |
//! | [`splice`](OrderedMap::splice) | Insert a group before/after an anchor |
//!
//! Nothing here returns an error. Absent keys are no-ops and absent anchors
//! fall back to the start (`Before`) or the end (`After`) of the map.
//!
//! ## Invariants
//!
//! - Entries that are not moved keep their relative order.
//! - No entry is created or dropped except the inserted group.
//! - A key appears at most once; inserting an existing key relocates it.

use crate::key::{Key, Scalar, to_key};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Where a spliced group lands relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Positional reference for [`OrderedMap::splice`].
///
/// Built from any key-like value. A null scalar means "no anchor".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor(Option<Key>);

impl Anchor {
    pub fn none() -> Self {
        Anchor(None)
    }

    pub fn key(&self) -> Option<&Key> {
        self.0.as_ref()
    }
}

impl From<Scalar> for Anchor {
    fn from(scalar: Scalar) -> Self {
        if scalar.is_null() {
            Anchor(None)
        } else {
            Anchor(Some(to_key(scalar)))
        }
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Anchor {
    fn from(value: Option<T>) -> Self {
        Scalar::from(value).into()
    }
}

macro_rules! anchor_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Anchor {
                fn from(value: $ty) -> Self {
                    Scalar::from(value).into()
                }
            }
        )*
    };
}

anchor_from!(&str, String, &String, i64, i32, u32, bool, f64, Key, &Key);

/// Values that can be compared against a key or searched for a substring.
///
/// `as_scalar` returns `None` for values with no scalar reading (nested
/// arrays or objects); those never match a value search.
pub trait Searchable {
    fn as_scalar(&self) -> Option<Scalar>;
}

impl Searchable for String {
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Str(self.clone()))
    }
}

impl Searchable for &str {
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::from(*self))
    }
}

impl Searchable for i64 {
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Int(*self))
    }
}

impl Searchable for i32 {
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::from(*self))
    }
}

impl Searchable for Scalar {
    fn as_scalar(&self) -> Option<Scalar> {
        Some(self.clone())
    }
}

impl Searchable for serde_json::Value {
    fn as_scalar(&self) -> Option<Scalar> {
        use serde_json::Value;
        match self {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Value::String(s) => Some(Scalar::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// An associative container with unique keys and significant order.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: IndexMap<Key, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<Scalar>, value: V) -> Option<V> {
        self.entries.insert(to_key(key), value)
    }

    pub fn get(&self, key: impl Into<Scalar>) -> Option<&V> {
        self.entries.get(&to_key(key))
    }

    pub fn get_mut(&mut self, key: impl Into<Scalar>) -> Option<&mut V> {
        self.entries.get_mut(&to_key(key))
    }

    pub fn contains_key(&self, key: impl Into<Scalar>) -> bool {
        self.entries.contains_key(&to_key(key))
    }

    /// Remove an entry, shifting later entries up by one.
    pub fn remove(&mut self, key: impl Into<Scalar>) -> Option<V> {
        self.entries.shift_remove(&to_key(key))
    }

    pub fn first(&self) -> Option<(&Key, &V)> {
        self.entries.first()
    }

    pub fn get_index(&self, index: usize) -> Option<(&Key, &V)> {
        self.entries.get_index(index)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> {
        self.entries.iter()
    }

    /// Zero-based position of `key` in the current order.
    ///
    /// `key` is coerced with [`to_key`] once; the lookup itself is exact, so
    /// `"1"` finds `Int(1)` but `"01"` does not.
    pub fn key_offset(&self, key: impl Into<Scalar>) -> Option<usize> {
        self.entries.get_index_of(&to_key(key))
    }

    /// Move the entry for `key` to position 0.
    ///
    /// Everything that was ahead of it shifts down by one; nothing else
    /// moves. A missing key leaves the map untouched.
    pub fn move_to_front(&mut self, key: impl Into<Scalar>) -> &mut Self {
        let key = to_key(key);
        match self.entries.get_index_of(&key) {
            Some(index) => self.entries.move_index(index, 0),
            None => tracing::debug!(%key, "move_to_front: key not present, map unchanged"),
        }
        self
    }

    /// Move a splice group into place and return the map for chaining.
    ///
    /// See [`Placement`] for where the group lands. Keys of `group` that
    /// already exist in the map are taken out of their old position first,
    /// so each key appears once, at the spliced position, holding the
    /// group's value.
    pub fn splice(
        &mut self,
        anchor: impl Into<Anchor>,
        group: OrderedMap<V>,
        placement: Placement,
    ) -> &mut Self {
        let anchor = anchor.into();
        let offset = anchor.key().and_then(|k| self.entries.get_index_of(k));
        if anchor.key().is_some() && offset.is_none() {
            tracing::debug!(?anchor, ?placement, "splice: anchor not present, using fallback position");
        }

        let mut at = match (placement, offset) {
            (Placement::Before, Some(index)) => index,
            (Placement::Before, None) => 0,
            (Placement::After, Some(index)) => index + 1,
            (Placement::After, None) => self.entries.len(),
        };

        for key in group.entries.keys() {
            if let Some(index) = self.entries.get_index_of(key) {
                if index < at {
                    at -= 1;
                }
                self.entries.shift_remove_index(index);
            }
        }

        let tail = self.entries.split_off(at);
        self.entries.extend(group.entries);
        self.entries.extend(tail);
        self
    }

    /// Insert `group` immediately before `anchor`, or at the start when the
    /// anchor is absent.
    pub fn insert_before(&mut self, anchor: impl Into<Anchor>, group: OrderedMap<V>) -> &mut Self {
        self.splice(anchor, group, Placement::Before)
    }

    /// Insert `group` immediately after `anchor`, or at the end when the
    /// anchor is absent.
    pub fn insert_after(&mut self, anchor: impl Into<Anchor>, group: OrderedMap<V>) -> &mut Self {
        self.splice(anchor, group, Placement::After)
    }
}

impl<V: Searchable> OrderedMap<V> {
    /// Position of the first entry whose value equals `key`.
    ///
    /// This is the value-space counterpart of [`key_offset`](Self::key_offset);
    /// see [`Key::matches_value`] for the equality used.
    pub fn value_offset(&self, key: impl Into<Scalar>) -> Option<usize> {
        let key = to_key(key);
        self.entries.values().position(|value| {
            value
                .as_scalar()
                .is_some_and(|scalar| key.matches_value(&scalar))
        })
    }

    /// Move each of `keys` to the front, in order.
    ///
    /// The last key processed ends up first. A key that is not present is
    /// looked up in the values instead and the first matching entry is
    /// moved. Keys found by neither lookup are skipped.
    pub fn move_many_to_front<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        for key in keys {
            let key = to_key(key);
            let index = match self.entries.get_index_of(&key) {
                Some(index) => Some(index),
                None => {
                    let found = self.value_offset(key.clone());
                    if found.is_some() {
                        tracing::debug!(%key, "move_many_to_front: key not present, matched by value");
                    }
                    found
                }
            };
            match index {
                Some(index) => self.entries.move_index(index, 0),
                None => tracing::debug!(%key, "move_many_to_front: no key or value match, skipped"),
            }
        }
        self
    }

    /// For each needle, move the first entry containing it to the front.
    ///
    /// Non-numeric keys are searched by key text; numeric keys by their
    /// value's text. When nothing matches that way, the values of
    /// non-numeric keys are searched as a second pass. Needles are applied in
    /// order against the order left by the previous needle, so an entry moved
    /// earlier can be matched again.
    pub fn move_matching_to_front<I>(&mut self, needles: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for needle in needles {
            let needle = needle.as_ref();
            let found = self
                .entries
                .iter()
                .position(|(key, value)| {
                    haystack(key, value).is_some_and(|text| text.contains(needle))
                })
                .or_else(|| {
                    let found = self.entries.iter().position(|(key, value)| {
                        !key.is_numeric() && value_text(value).is_some_and(|text| text.contains(needle))
                    });
                    if found.is_some() {
                        tracing::debug!(needle, "move_matching_to_front: no key matched, matched by value");
                    }
                    found
                });
            match found {
                Some(index) => self.entries.move_index(index, 0),
                None => tracing::debug!(needle, "move_matching_to_front: no entry matched, skipped"),
            }
        }
        self
    }
}

fn haystack<'a, V: Searchable>(key: &'a Key, value: &V) -> Option<Cow<'a, str>> {
    if key.is_numeric() {
        value_text(value).map(Cow::Owned)
    } else {
        Some(key.as_text())
    }
}

fn value_text<V: Searchable>(value: &V) -> Option<String> {
    value
        .as_scalar()
        .and_then(|scalar| scalar.text().map(|text| text.into_owned()))
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<K: Into<Scalar>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<Scalar>, V> Extend<(K, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (Key, V);
    type IntoIter = indexmap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<Key, V>()? {
            map.entries.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
