//! Write-once cells backing the assessment builders.
//!
//! Each configuration field may be supplied at most once. The second write
//! fails at the call that attempts it, and reading a field that was never
//! written fails with the field's name.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A named value that must be set exactly once before it is read.
#[derive(Debug, Clone)]
pub struct SetOnce<T> {
    field: &'static str,
    value: Option<T>,
}

impl<T> SetOnce<T> {
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self { field, value: None }
    }

    /// Store the value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateField`] if the value was already set.
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        if self.value.is_some() {
            return Err(ConfigError::DuplicateField { field: self.field });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Borrow the value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if the value was never set.
    pub fn get(&self) -> Result<&T, ConfigError> {
        self.value
            .as_ref()
            .ok_or(ConfigError::MissingField { field: self.field })
    }

    /// Consume the cell, yielding the value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if the value was never set.
    pub fn into_value(self) -> Result<T, ConfigError> {
        self.value
            .ok_or(ConfigError::MissingField { field: self.field })
    }

    /// Consume the cell; an unset value is `None` rather than an error.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        self.value
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

/// A map whose entries may each be written once.
#[derive(Debug, Clone)]
pub struct SetOnceMap<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> SetOnceMap<K, V> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a value for a key that has not been written yet.
    ///
    /// # Errors
    ///
    /// Returns the error built by `on_duplicate` if `key` already has a value.
    pub fn insert<F>(&mut self, key: K, value: V, on_duplicate: F) -> Result<(), ConfigError>
    where
        F: FnOnce(K) -> ConfigError,
    {
        if self.entries.contains_key(&key) {
            return Err(on_duplicate(key));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_map(self) -> BTreeMap<K, V> {
        self.entries
    }
}

impl<K: Ord, V> Default for SetOnceMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
