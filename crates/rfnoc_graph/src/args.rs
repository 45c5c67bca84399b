// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block argument dictionary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// String-to-string block arguments.
///
/// Keeps insertion order so that diagnostics list arguments the way they
/// were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockArgs {
    entries: IndexMap<String, String>,
}

impl BlockArgs {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.entries.insert(key.into(), value.to_string())
    }

    /// Get a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a value converted with [`FromStr`].
    ///
    /// Returns `None` when the key is absent and `Some(Err(_))` when the
    /// value does not convert.
    pub fn get_as<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(str::parse)
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Copy every entry of `other` into `self`, overwriting shared keys
    pub fn merge(&mut self, other: &BlockArgs) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for BlockArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_and_retains() {
        let mut args = BlockArgs::new().with("spp", 364).with("freq", "1e9");
        args.merge(&BlockArgs::new().with("spp", 200).with("gain", 10));

        assert_eq!(args.get("spp"), Some("200"));
        assert_eq!(args.get("freq"), Some("1e9"));
        assert_eq!(args.get("gain"), Some("10"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_typed_access() {
        let args = BlockArgs::new().with("decim", 4).with("mode", "fast");
        assert_eq!(args.get_as::<u32>("decim"), Some(Ok(4)));
        assert!(matches!(args.get_as::<u32>("mode"), Some(Err(_))));
        assert!(args.get_as::<u32>("missing").is_none());
    }

    #[test]
    fn test_insertion_order() {
        let args: BlockArgs = [("b", 1), ("a", 2)].into_iter().collect();
        let keys: Vec<_> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
