//! Header storage shared by requests and responses.
//!
//! Names are kept exactly as supplied, without canonicalization. Inserting a
//! name that is already present replaces its value, so the last occurrence of a
//! duplicate header wins.

use std::collections::BTreeMap;
use std::collections::btree_map;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: BTreeMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, returning the value it replaced.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) -> Option<String> {
        self.inner.insert(name.into(), value.into())
    }

    /// Looks a header up by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Looks a header up ignoring ASCII case, for the framing headers a server may
    /// spell in any case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| self.inner.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str()))
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl IntoIterator for HeaderMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_duplicate_wins() {
        let headers: HeaderMap = [("X-Rate", "1"), ("X-Rate", "2")].into_iter().collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Rate"), Some("2"));
    }

    #[test]
    fn names_keep_their_case() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", "5");

        assert_eq!(headers.get("Content-Length"), None);
        assert_eq!(headers.get_ignore_case("Content-Length"), Some("5"));
        assert_eq!(headers.iter().next(), Some(("content-length", "5")));
    }
}
