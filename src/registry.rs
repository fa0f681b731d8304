//! Name-keyed generator collection.
//!
//! Keeps generators in a `Vec` so iteration order is always the insertion order
//! (or the dependency order once sorted). Lookup is case-insensitive.

use crate::error::SortError;
use crate::sorter::{sort_by_name, Named};

pub struct Registry<T: ?Sized + Named> {
    items: Vec<Box<T>>,
}

impl<T: ?Sized + Named> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: ?Sized + Named> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a generator. Names must be unique ignoring case.
    pub fn register(&mut self, item: Box<T>) -> Result<(), SortError> {
        if self.contains(item.name()) {
            return Err(SortError::DuplicateName(item.name().to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.name().eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|i| self.items[i].as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let i = self.position(name)?;
        Some(self.items[i].as_mut())
    }

    /// Take a generator out of the registry.
    pub fn remove(&mut self, name: &str) -> Option<Box<T>> {
        let i = self.position(name)?;
        Some(self.items.remove(i))
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|b| b.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().map(|b| b.as_mut())
    }

    /// Reorder the generators so each one follows all of its dependencies.
    /// On failure the registry is left untouched.
    pub fn sort_by_dependencies(&mut self) -> Result<(), SortError> {
        let order = {
            let refs: Vec<&T> = self.iter().collect();
            sort_by_name(&refs)?
        };

        let mut slots: Vec<Option<Box<T>>> = self.items.drain(..).map(Some).collect();
        self.items = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Stage: Named {
        fn tag(&self) -> u32;
    }

    struct Fixed(&'static str, &'static [&'static str], u32);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
        fn dependencies(&self) -> Vec<String> {
            self.1.iter().map(|s| s.to_string()).collect()
        }
    }

    impl Stage for Fixed {
        fn tag(&self) -> u32 {
            self.2
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut reg: Registry<dyn Stage> = Registry::new();
        reg.register(Box::new(Fixed("height", &[], 1))).unwrap();
        assert!(reg.register(Box::new(Fixed("HEIGHT", &[], 2))).is_err());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut reg: Registry<dyn Stage> = Registry::new();
        reg.register(Box::new(Fixed("height", &[], 1))).unwrap();
        reg.register(Box::new(Fixed("heat", &["height"], 2))).unwrap();

        assert_eq!(reg.get("Heat").map(|s| s.tag()), Some(2));
        assert!(reg.get("moisture").is_none());
        assert!(reg.get_mut("height").is_some());
    }

    #[test]
    fn test_remove_by_name() {
        let mut reg: Registry<dyn Stage> = Registry::new();
        reg.register(Box::new(Fixed("height", &[], 1))).unwrap();
        reg.register(Box::new(Fixed("heat", &["height"], 2))).unwrap();

        assert_eq!(reg.remove("HEIGHT").map(|s| s.tag()), Some(1));
        assert!(reg.remove("height").is_none());
        assert_eq!(reg.names(), vec!["heat"]);
    }

    #[test]
    fn test_sort_reorders_in_place() {
        let mut reg: Registry<dyn Stage> = Registry::new();
        reg.register(Box::new(Fixed("heat", &["height"], 2))).unwrap();
        reg.register(Box::new(Fixed("moisture", &[], 3))).unwrap();
        reg.register(Box::new(Fixed("height", &[], 1))).unwrap();

        reg.sort_by_dependencies().unwrap();
        assert_eq!(reg.names(), vec!["moisture", "height", "heat"]);
    }

    #[test]
    fn test_failed_sort_keeps_registry() {
        let mut reg: Registry<dyn Stage> = Registry::new();
        reg.register(Box::new(Fixed("a", &["b"], 1))).unwrap();
        reg.register(Box::new(Fixed("b", &["a"], 2))).unwrap();

        assert!(reg.sort_by_dependencies().is_err());
        assert_eq!(reg.names(), vec!["a", "b"]);
    }
}
