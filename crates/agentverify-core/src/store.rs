use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Concurrency-safe keyed store over string keys.
///
/// Every registry in the system shares requests across tasks, so all
/// read-modify-write cycles must go through `mutate`, which holds the
/// per-key lock for the duration of the closure.
pub trait KeyedStore<V: Clone + Send + Sync>: Send + Sync {
    /// Get a clone of the value for `key`.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace the value for `key`, returning the previous value.
    fn put(&self, key: String, value: V) -> Option<V>;

    /// Insert only if `key` is absent. Returns the existing value on conflict.
    fn put_if_absent(&self, key: String, value: V) -> Result<(), V>;

    /// Apply `f` to the value for `key` under the per-key lock.
    /// Returns the updated value, or `None` if the key is absent.
    fn mutate(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> Option<V>;

    /// Remove and return the value for `key`.
    fn remove(&self, key: &str) -> Option<V>;

    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool;

    /// Clones of all stored values, in no particular order.
    fn values(&self) -> Vec<V>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the entries for which `f` returns true.
    fn retain(&self, f: &mut dyn FnMut(&str, &V) -> bool);
}

/// In-memory `KeyedStore` backed by a `DashMap`.
pub struct MemoryStore<V> {
    map: DashMap<String, V>,
}

impl<V> MemoryStore<V> {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> KeyedStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.map.get(key).map(|entry| entry.clone())
    }

    fn put(&self, key: String, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    fn put_if_absent(&self, key: String, value: V) -> Result<(), V> {
        match self.map.entry(key) {
            Entry::Occupied(existing) => Err(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    fn mutate(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> Option<V> {
        self.map.get_mut(key).map(|mut entry| {
            f(entry.value_mut());
            entry.clone()
        })
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.map.remove(key).map(|(_, value)| value)
    }

    fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn values(&self) -> Vec<V> {
        self.map.iter().map(|entry| entry.value().clone()).collect()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn retain(&self, f: &mut dyn FnMut(&str, &V) -> bool) {
        self.map.retain(|key, value| f(key.as_str(), value));
    }
}
