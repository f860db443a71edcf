// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file trait definition.
//!
//! This module defines the `ConfigFile` trait, the interface other subsystems use to
//! read and write persisted settings. Implementations keep a flat cache of
//! [`Value`]s keyed by name and persist it through a single codec and file path.

use crate::domain::{ObjectMap, Result, Value};
use std::path::Path;

/// A flat, typed, defaulted key-value cache backed by one file.
///
/// Implementors provide the cache and the I/O; the typed getters, the upsert and
/// the membership helpers are provided on top of [`values`](Self::values).
///
/// # Defaulted reads
///
/// Every `get_*` method returns the caller's default when the key is absent *or*
/// when the stored value holds a different type. Reads never fail.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{ConfigFile, ObjectMap, Result};
/// use std::path::{Path, PathBuf};
///
/// struct MemoryConfig {
///     path: PathBuf,
///     cache: ObjectMap,
/// }
///
/// impl ConfigFile for MemoryConfig {
///     fn values(&self) -> &ObjectMap { &self.cache }
///     fn values_mut(&mut self) -> &mut ObjectMap { &mut self.cache }
///     fn filename(&self) -> &Path { &self.path }
///     fn set_filename(&mut self, path: &Path) -> Result<()> {
///         self.path = path.to_path_buf();
///         self.load()
///     }
///     fn load(&mut self) -> Result<()> { Ok(()) }
///     fn save(&mut self) -> Result<()> { Ok(()) }
/// }
///
/// let mut config = MemoryConfig { path: PathBuf::new(), cache: ObjectMap::new() };
/// config.set_property("volume", 80);
/// assert_eq!(config.get_int("volume", 0), 80);
/// assert_eq!(config.get_string("volume", "none"), "none");
/// ```
pub trait ConfigFile {
    /// Borrows the cache.
    fn values(&self) -> &ObjectMap;

    /// Mutably borrows the cache.
    fn values_mut(&mut self) -> &mut ObjectMap;

    /// Returns the path used by [`load`](Self::load) and [`save`](Self::save).
    fn filename(&self) -> &Path;

    /// Sets the file path and immediately reloads from it.
    ///
    /// Unsaved edits made before the call are discarded.
    fn set_filename(&mut self, path: &Path) -> Result<()>;

    /// Reads the file into the cache.
    fn load(&mut self) -> Result<()>;

    /// Writes the cache to the file.
    fn save(&mut self) -> Result<()>;

    /// Forces an output of the current cache; same as [`save`](Self::save).
    fn flush(&mut self) -> Result<()> {
        self.save()
    }

    /// Returns `true` if the key is present in the cache. No file I/O is performed.
    fn exists(&self, key: &str) -> bool {
        self.values().contains_key(key)
    }

    /// Returns the stored value for the key, if any.
    fn get(&self, key: &str) -> Option<&Value> {
        self.values().get(key)
    }

    /// Returns the signed integer stored under `key`, or `default`.
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::SignedInteger(n)) => *n,
            _ => default,
        }
    }

    /// Returns the unsigned integer stored under `key`, or `default`.
    fn get_uint(&self, key: &str, default: u64) -> u64 {
        match self.get(key) {
            Some(Value::UnsignedInteger(n)) => *n,
            _ => default,
        }
    }

    /// Returns the real number stored under `key`, or `default`.
    fn get_double(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(Value::Real(n)) => *n,
            _ => default,
        }
    }

    /// Returns the string stored under `key`, or `default`.
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// Returns the boolean stored under `key`, or `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Boolean(b)) => *b,
            _ => default,
        }
    }

    /// Stores `value` under `key`, replacing any existing entry.
    fn set_property<V>(&mut self, key: &str, value: V)
    where
        V: Into<Value>,
        Self: Sized,
    {
        let cache = self.values_mut();
        cache.remove(key);
        cache.insert(key.to_string(), value.into());
    }

    /// Removes the entry stored under `key`. No file I/O is performed.
    ///
    /// Returns `true` whether or not the key was present.
    fn erase(&mut self, key: &str) -> bool {
        self.values_mut().remove(key);
        true
    }
}
