//! Path-based access into nested mappings.
//!
//! A nested mapping is any structure whose levels map keys either to a
//! terminal value or to another level. Two shapes are supported out of the
//! box: the explicit [`Nested`] tree and `serde_json::Value`, where only
//! `Object` is a mapping level.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// A tree of mappings with terminal values at the leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<K, V> {
    /// A terminal value; it cannot be indexed further.
    Value(V),
    /// One mapping level.
    Map(BTreeMap<K, Nested<K, V>>),
}

impl<K: Ord, V> Nested<K, V> {
    pub fn value(value: V) -> Self {
        Self::Value(value)
    }

    /// Build a mapping level from `(key, child)` pairs.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Nested<K, V>)>,
    {
        Self::Map(entries.into_iter().collect())
    }

    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(v) => Some(v),
            Self::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<K, Nested<K, V>>> {
        match self {
            Self::Map(m) => Some(m),
            Self::Value(_) => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }
}

impl From<Value> for Nested<String, Value> {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, child)| (key, Nested::from(child)))
                    .collect(),
            ),
            other => Self::Value(other),
        }
    }
}

/// One level of a nested mapping that can be indexed by key.
pub trait NestedLookup {
    type Key: ?Sized;

    /// Returns the child stored under `key`, or `None` when this level is not
    /// a mapping or has no such key.
    fn child(&self, key: &Self::Key) -> Option<&Self>;
}

impl<K: Ord, V> NestedLookup for Nested<K, V> {
    type Key = K;

    fn child(&self, key: &K) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            Self::Value(_) => None,
        }
    }
}

impl NestedLookup for Value {
    type Key = str;

    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}

/// A path segment could not be resolved.
///
/// Raised both when the key is absent from the current level and when the
/// current value is terminal and cannot be indexed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNotFound<K> {
    /// The first path segment that could not be resolved.
    pub key: K,
    /// Zero-based position of `key` in the path.
    pub depth: usize,
}

impl<K> KeyNotFound<K> {
    pub fn map_key<U>(self, f: impl FnOnce(K) -> U) -> KeyNotFound<U> {
        KeyNotFound {
            key: f(self.key),
            depth: self.depth,
        }
    }
}

impl<K: fmt::Display> fmt::Display for KeyNotFound<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key not found: {}", self.key)
    }
}

impl<K: fmt::Debug + fmt::Display> std::error::Error for KeyNotFound<K> {}

/// Walk `path` from `root`, one level per key.
///
/// An empty path returns `root` itself. The walk stops at the first key that
/// cannot be resolved; no partial result is returned.
pub fn access<'a, N, Q>(root: &'a N, path: &[Q]) -> Result<&'a N, KeyNotFound<Q>>
where
    N: NestedLookup + ?Sized,
    Q: Borrow<N::Key> + Clone,
{
    path.iter()
        .enumerate()
        .try_fold(root, |node, (depth, key)| {
            node.child(key.borrow()).ok_or_else(|| KeyNotFound {
                key: key.clone(),
                depth,
            })
        })
}

/// [`access`] specialised to JSON documents, with an owned key in the error.
pub fn access_nested_map<'a>(
    map: &'a Value,
    path: &[&str],
) -> Result<&'a Value, KeyNotFound<String>> {
    access(map, path).map_err(|e| e.map_key(|key| key.to_string()))
}
