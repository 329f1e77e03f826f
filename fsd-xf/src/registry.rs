//! Checked values per checkbox panel.

use fsd_core::Attribute;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, XfError};

/// Filter key -> the values currently checked in that key's panel.
///
/// Keys exist only if they were initialized at load time; any other key is a
/// usage error. The registry is plain state: keeping it in step with the
/// dimension filters is the coordinator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRegistry {
    entries: BTreeMap<Attribute, BTreeSet<String>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` with the given values checked.
    pub fn initialize<I, S>(&mut self, key: Attribute, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key, values.into_iter().map(Into::into).collect());
    }

    pub fn contains_key(&self, key: Attribute) -> bool {
        self.entries.contains_key(&key)
    }

    /// The checked set for `key`, if the key has a panel.
    pub fn checked_mut(&mut self, key: Attribute) -> Option<&mut BTreeSet<String>> {
        self.entries.get_mut(&key)
    }

    pub fn get(&self, key: Attribute) -> Result<&BTreeSet<String>> {
        self.entries
            .get(&key)
            .ok_or(XfError::UnknownFilterKey(key))
    }

    fn entry(&mut self, key: Attribute) -> Result<&mut BTreeSet<String>> {
        self.checked_mut(key).ok_or(XfError::UnknownFilterKey(key))
    }

    pub fn is_checked(&self, key: Attribute, value: &str) -> Result<bool> {
        Ok(self.get(key)?.contains(value))
    }

    /// Replace the checked set for `key`.
    pub fn set<I, S>(&mut self, key: Attribute, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.entry(key)? = values.into_iter().map(Into::into).collect();
        Ok(())
    }

    /// Returns true if the value was not already checked.
    pub fn check(&mut self, key: Attribute, value: &str) -> Result<bool> {
        Ok(self.entry(key)?.insert(value.to_string()))
    }

    /// Returns true if the value was checked.
    pub fn uncheck(&mut self, key: Attribute, value: &str) -> Result<bool> {
        Ok(self.entry(key)?.remove(value))
    }

    pub fn clear(&mut self, key: Attribute) -> Result<()> {
        self.entry(key)?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_and_toggle() {
        let mut registry = FilterRegistry::new();
        registry.initialize(Attribute::Lake, ["ER", "HU", "ON"]);
        assert!(registry.is_checked(Attribute::Lake, "HU").unwrap());

        assert!(registry.uncheck(Attribute::Lake, "HU").unwrap());
        assert!(!registry.uncheck(Attribute::Lake, "HU").unwrap());
        assert!(!registry.is_checked(Attribute::Lake, "HU").unwrap());

        assert!(registry.check(Attribute::Lake, "HU").unwrap());
        assert_eq!(registry.get(Attribute::Lake).unwrap().len(), 3);
    }

    #[test]
    fn test_clear_and_set() {
        let mut registry = FilterRegistry::new();
        registry.initialize(Attribute::Species, ["Walleye", "Lake Trout"]);
        registry.clear(Attribute::Species).unwrap();
        assert!(registry.get(Attribute::Species).unwrap().is_empty());

        registry.set(Attribute::Species, ["Walleye"]).unwrap();
        let checked: Vec<&str> = registry
            .get(Attribute::Species)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(checked, vec!["Walleye"]);
    }

    #[test]
    fn test_unknown_key_is_a_usage_error() {
        let mut registry = FilterRegistry::new();
        registry.initialize(Attribute::Lake, ["ER"]);
        assert_eq!(
            registry.get(Attribute::Grid10),
            Err(XfError::UnknownFilterKey(Attribute::Grid10))
        );
        assert_eq!(
            registry.check(Attribute::Mark, "AD"),
            Err(XfError::UnknownFilterKey(Attribute::Mark))
        );
        assert!(registry.clear(Attribute::Geom).is_err());
        assert!(registry.set(Attribute::Strain, ["SEN"]).is_err());
        assert!(!registry.contains_key(Attribute::Geom));
        assert!(registry.checked_mut(Attribute::Geom).is_none());
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = FilterRegistry::new();
        let mut b = FilterRegistry::new();
        a.initialize(Attribute::Lake, ["ER"]);
        b.initialize(Attribute::Lake, ["ER"]);
        a.clear(Attribute::Lake).unwrap();
        assert!(b.is_checked(Attribute::Lake, "ER").unwrap());
    }
}
