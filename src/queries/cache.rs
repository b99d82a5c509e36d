use std::collections::HashMap;

/// Fetched collections keyed by `(collection, device_id)`.
#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<(&'static str, String), Vec<T>>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &'static str, device_id: &str) -> Option<Vec<T>> {
        self.entries
            .get(&(collection, device_id.to_string()))
            .cloned()
    }

    pub fn put(&mut self, collection: &'static str, device_id: &str, rows: Vec<T>) {
        self.entries.insert((collection, device_id.to_string()), rows);
    }

    pub fn contains(&self, collection: &'static str, device_id: &str) -> bool {
        self.entries
            .contains_key(&(collection, device_id.to_string()))
    }

    /// Drop every cached key of `collection`.
    pub fn invalidate(&mut self, collection: &'static str) {
        self.entries.retain(|(c, _), _| *c != collection);
    }
}
