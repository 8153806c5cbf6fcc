//! Dataset access: anything that maps a variable key to a sample series.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// Variable key: a row position for matrix-like data or a column name for maps.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

/// Indexable collection of one-dimensional sample series.
///
/// Sample counts are expected to agree across variables but this is not checked here;
/// a mismatch surfaces from the 2-D density estimator.
pub trait Dataset {
    /// All keys in natural iteration order.
    fn keys(&self) -> Vec<Key>;

    /// Samples for `key`, or `None` if the key does not address a variable.
    fn series(&self, key: &Key) -> Option<&[f64]>;
}

impl Dataset for [Vec<f64>] {
    fn keys(&self) -> Vec<Key> {
        (0..self.len()).map(Key::Index).collect()
    }

    fn series(&self, key: &Key) -> Option<&[f64]> {
        match key {
            Key::Index(i) => self.get(*i).map(Vec::as_slice),
            Key::Name(_) => None,
        }
    }
}

impl Dataset for Vec<Vec<f64>> {
    fn keys(&self) -> Vec<Key> {
        self.as_slice().keys()
    }

    fn series(&self, key: &Key) -> Option<&[f64]> {
        self.as_slice().series(key)
    }
}

impl Dataset for IndexMap<String, Vec<f64>> {
    fn keys(&self) -> Vec<Key> {
        self.keys().cloned().map(Key::Name).collect()
    }

    fn series(&self, key: &Key) -> Option<&[f64]> {
        match key {
            Key::Name(name) => self.get(name).map(Vec::as_slice),
            Key::Index(_) => None,
        }
    }
}

impl Dataset for BTreeMap<String, Vec<f64>> {
    fn keys(&self) -> Vec<Key> {
        self.keys().cloned().map(Key::Name).collect()
    }

    fn series(&self, key: &Key) -> Option<&[f64]> {
        match key {
            Key::Name(name) => self.get(name).map(Vec::as_slice),
            Key::Index(_) => None,
        }
    }
}
