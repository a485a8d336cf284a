//! Insertion-ordered name registry.
//!
//! Module trees are small and iteration order matters more than lookup speed,
//! so entries live in a `Vec` and lookups scan linearly.

use std::ops::Index;

/// Map from local names to values that iterates in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace `name`.
    ///
    /// A replaced entry keeps its original position; the previous value is returned.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Insert or replace `name` and return a reference to the stored value.
    pub fn upsert(&mut self, name: impl Into<String>, value: T) -> &mut T {
        let name = name.into();
        let idx = match self.position(&name) {
            Some(idx) => {
                self.entries[idx].1 = value;
                idx
            }
            None => {
                self.entries.push((name, value));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Remove `name`, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.position(name).map(move |idx| &mut self.entries[idx].1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (&str, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn into_values(self) -> impl DoubleEndedIterator<Item = T> {
        self.entries.into_iter().map(|(_, v)| v)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == name)
    }
}

impl<T> Index<&str> for Registry<T> {
    type Output = T;

    fn index(&self, name: &str) -> &T {
        self.get(name)
            .unwrap_or_else(|| panic!("no entry named '{name}' in registry"))
    }
}

impl<T> IntoIterator for Registry<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for (k, v) in iter {
            registry.insert(k, v);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_insertion_order() {
        let mut reg = Registry::new();
        reg.insert("b", 1);
        reg.insert("a", 2);
        reg.insert("c", 3);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replace_keeps_position_and_returns_previous() {
        let mut reg = Registry::new();
        reg.insert("x", 1);
        reg.insert("y", 2);
        assert_eq!(reg.insert("x", 10), Some(1));
        assert_eq!(reg.iter().collect::<Vec<_>>(), vec![("x", &10), ("y", &2)]);
    }

    #[test]
    fn test_upsert_returns_stored_value() {
        let mut reg = Registry::new();
        reg.insert("a", 1);
        *reg.upsert("a", 5) += 1;
        *reg.upsert("b", 7) += 1;
        assert_eq!(reg.iter().collect::<Vec<_>>(), vec![("a", &6), ("b", &8)]);
    }

    #[test]
    fn test_remove_preserves_remaining_order() {
        let mut reg: Registry<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(reg.remove("b"), Some(2));
        assert_eq!(reg.remove("missing"), None);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_index_and_get_mut() {
        let mut reg: Registry<i32> = [("a", 1)].into_iter().collect();
        *reg.get_mut("a").unwrap() += 1;
        assert_eq!(reg["a"], 2);
        assert!(reg.contains_key("a"));
        assert!(!reg.contains_key("b"));
    }

    #[test]
    #[should_panic(expected = "no entry named 'nope'")]
    fn test_index_missing_panics() {
        let reg: Registry<i32> = Registry::new();
        let _missing = reg["nope"];
    }
}
