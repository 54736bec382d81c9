//! Common backend trait for durable storage
//!
//! This module defines the Storage trait that the file-based and
//! database backends implement, allowing the history and identity stores
//! to work with either backend (or an in-memory one in tests).

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Key holding the serialized history sequence
pub const HISTORY_KEY: &str = "brandmeld_history";

/// Key holding the signed-in user profile
pub const USER_KEY: &str = "brandmeld_user";

/// Key holding the editable working draft
pub const WORKSPACE_KEY: &str = "brandmeld_workspace";

/// Durable key/value storage
///
/// Values are opaque text. Writes replace the whole value atomically.
pub trait Storage {
    /// Read the value stored under `key`, if any
    #[must_use = "Read results should be used"]
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Short backend name for status output
    fn name(&self) -> &'static str;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Reject keys that cannot be used as a file name
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidStorageKey {
            key: key.to_string(),
        })
    }
}

/// Process-local storage, used in tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is present under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.values.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
