//! Case-insensitive, insertion-ordered header storage.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
}

impl Entry {
    fn size(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

/// Header map keyed by lower-cased key.
///
/// The key as it was last inserted is kept for display. Iteration follows
/// insertion order; replacing a value keeps the entry's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveHeaders {
    entries: IndexMap<String, Entry>,
}

impl CaseInsensitiveHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let entry = Entry {
            key: key.clone(),
            value: value.into(),
        };
        self.entries
            .insert(key.to_lowercase(), entry)
            .map(|old| old.value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_lowercase())
            .map(|entry| entry.value.as_str())
    }

    /// Removes a header, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries
            .shift_remove(&key.to_lowercase())
            .map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(original-case key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    /// Sum of key and value byte lengths over all entries.
    pub fn byte_size(&self) -> usize {
        self.entries.values().map(Entry::size).sum()
    }

    /// Keeps the smallest entries that fit into `max_bytes` together.
    ///
    /// Entries are taken in ascending order of their size until the next one
    /// would exceed the budget. The kept entries retain their order.
    pub fn truncate(&self, max_bytes: usize) -> CaseInsensitiveHeaders {
        let mut by_size: Vec<(usize, usize)> = self
            .entries
            .values()
            .map(Entry::size)
            .enumerate()
            .collect();
        by_size.sort_by_key(|&(_, size)| size);

        let mut keep = vec![false; by_size.len()];
        let mut remaining = max_bytes;
        for (index, size) in by_size {
            if size > remaining {
                break;
            }
            remaining -= size;
            keep[index] = true;
        }

        let entries = self
            .entries
            .iter()
            .zip(keep)
            .filter(|(_, kept)| *kept)
            .map(|((lower, entry), _)| (lower.clone(), entry.clone()))
            .collect();
        CaseInsensitiveHeaders { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CaseInsensitiveHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = CaseInsensitiveHeaders::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for CaseInsensitiveHeaders {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
