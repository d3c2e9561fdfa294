use std::collections::HashMap;

/// Last decoded value seen per key within one watch session.
///
/// Single-writer: only the owning session task touches it.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&T> {
        self.entries.get(key)
    }

    /// Store `value` for `key`, returning what was there before
    pub fn insert(
        &mut self,
        key: String,
        value: T,
    ) -> Option<T> {
        self.entries.insert(key, value)
    }

    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<T> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
