// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed configuration store.
//!
//! This module provides `ConfigStore`, the implementation of the `ConfigFile`
//! trait. A store keeps a flat map of scalar settings and persists it through one
//! codec as a document of the shape `{"root": {key: value, ...}}`.

use crate::domain::{ConfigFile, ObjectMap, Result, TreeError, Value};
use crate::ports::{LogSink, ValueCodec};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key of the wrapper object written around the settings.
pub const ROOT_KEY: &str = "root";

/// A flat, typed settings cache persisted through a codec.
///
/// Loading reads every object at the top level of the document and copies its
/// scalar members into the cache. Saving writes the cache back under a single
/// [`ROOT_KEY`] member. Both report failures through the store's [`LogSink`].
///
/// The store is saved when it is dropped, whether or not it was modified since it
/// was loaded. A store without a filename, or with nothing in its cache, writes
/// nothing.
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<()> {
/// let mut cfg = JsonConfigFile::new(JsonCodec::new());
/// cfg.set_filename(Path::new("cfg.json"))?;
/// cfg.set_property("volume", 80);
/// assert_eq!(cfg.get_int("volume", 0), 80);
/// // written back to cfg.json here
/// drop(cfg);
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore<C: ValueCodec> {
    /// Path used by `load` and `save`; empty until assigned
    filename: PathBuf,
    /// The settings
    cache: ObjectMap,
    /// Codec used to read and write the file
    codec: C,
    /// Sink for failures and cache changes
    logger: LogSink,
}

impl<C: ValueCodec> ConfigStore<C> {
    /// Creates an empty store with no filename.
    ///
    /// The store reports to the same sink as `codec`.
    pub fn new(codec: C) -> Self {
        let logger = codec.logger().clone();
        Self {
            filename: PathBuf::new(),
            cache: ObjectMap::new(),
            codec,
            logger,
        }
    }

    /// Creates a store for `path` and loads it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds a nested
    /// setting.
    pub fn open<P: AsRef<Path>>(path: P, codec: C) -> Result<Self> {
        let mut store = Self::new(codec);
        store.set_filename(path.as_ref())?;
        Ok(store)
    }

    /// Creates a store for `file_name` in the OS-appropriate configuration
    /// directory of the application.
    ///
    /// The directory is created when missing. An existing file is loaded; a
    /// missing one leaves the store empty until it is first saved.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `file_name` - The settings file name (e.g., "settings.json")
    /// * `codec` - The codec used for the file
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use treecfg::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let cfg = JsonConfigFile::from_default_location("myapp", "com.example", "settings.json", JsonCodec::new())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_default_location(
        app_name: &str,
        qualifier: &str,
        file_name: &str,
        codec: C,
    ) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            TreeError::file_access(
                Path::new(file_name),
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Failed to determine project directories",
                ),
            )
        })?;

        let config_dir = proj_dirs.config_dir();
        let mut store = Self::new(codec);
        let created = fs::create_dir_all(config_dir).map_err(|e| TreeError::file_access(config_dir, e));
        store.logger.report(created)?;

        let path = config_dir.join(file_name);
        if path.exists() {
            store.set_filename(&path)?;
        } else {
            store.filename = path;
        }
        Ok(store)
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the number of settings.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if no settings are stored.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn absorb(&mut self, document: &Value) -> Result<()> {
        for (name, entry) in document.iter() {
            let Some(members) = entry.as_object() else {
                tracing::debug!(entry = ?name, kind = entry.type_name(), "ignoring top-level entry that is not an object");
                continue;
            };

            for (key, member) in members {
                match member {
                    Value::Null => {
                        tracing::debug!(key = %key, "ignoring empty setting");
                    }
                    Value::Array(_) | Value::Object(_) => {
                        return Err(TreeError::schema(format!(
                            "setting '{}' is a nested {} value",
                            key,
                            member.type_name()
                        )));
                    }
                    scalar => {
                        tracing::trace!(key = %key, "loaded setting");
                        self.set_property(key, scalar.clone());
                    }
                }
            }
        }
        Ok(())
    }

    fn document(&self) -> Result<Value> {
        if let Some((key, member)) = self.cache.iter().find(|(_, v)| v.is_null() || !v.is_scalar()) {
            return Err(TreeError::schema(format!(
                "setting '{}' holds a {} value, expected a scalar",
                key,
                member.type_name()
            )));
        }

        let mut document = ObjectMap::new();
        document.insert(ROOT_KEY.to_string(), Value::Object(self.cache.clone()));
        Ok(Value::Object(document))
    }
}

impl<C: ValueCodec> ConfigFile for ConfigStore<C> {
    fn values(&self) -> &ObjectMap {
        &self.cache
    }

    fn values_mut(&mut self) -> &mut ObjectMap {
        &mut self.cache
    }

    fn filename(&self) -> &Path {
        &self.filename
    }

    fn set_filename(&mut self, path: &Path) -> Result<()> {
        self.filename = path.to_path_buf();
        self.load()
    }

    /// Reads the file and merges its settings into the cache.
    ///
    /// Settings read before a failure stay in the cache.
    fn load(&mut self) -> Result<()> {
        let document = self.codec.load(&self.filename)?;
        let logger = self.logger.clone();
        let absorbed = logger.in_scope(|| self.absorb(&document));
        logger.report(absorbed)?;

        logger.in_scope(|| {
            tracing::debug!(
                "loaded {} settings from {}",
                self.cache.len(),
                self.filename.display()
            )
        });
        Ok(())
    }

    /// Writes the cache to the file under a single `root` member.
    ///
    /// An empty cache is not written.
    fn save(&mut self) -> Result<()> {
        let document = self.logger.report(self.document())?;
        if self.cache.is_empty() {
            self.logger
                .in_scope(|| tracing::debug!("no settings to write to {}", self.filename.display()));
            return Ok(());
        }
        self.codec.save(&document, &self.filename)
    }
}

impl<C: ValueCodec> Drop for ConfigStore<C> {
    fn drop(&mut self) {
        if self.filename.as_os_str().is_empty() {
            return;
        }
        // failures were already reported by save
        let _ = self.flush();
    }
}

impl<C: ValueCodec + std::fmt::Debug> std::fmt::Debug for ConfigStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("filename", &self.filename)
            .field("cache", &self.cache)
            .field("codec", &self.codec)
            .finish()
    }
}

/// A configuration store persisted as JSON.
#[cfg(feature = "json")]
pub type JsonConfigFile = ConfigStore<crate::adapters::JsonCodec>;

/// A configuration store persisted as XML.
#[cfg(feature = "xml")]
pub type XmlConfigFile = ConfigStore<crate::adapters::XmlCodec>;

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::adapters::JsonCodec;
    use crate::domain::ErrorKind;
    use tempfile::TempDir;

    fn codec() -> JsonCodec {
        JsonCodec::new().with_logger(LogSink::silent())
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ConfigStore::new(codec());
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.filename(), Path::new(""));
    }

    #[test]
    fn test_save_wraps_settings_in_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");

        let mut store = ConfigStore::new(codec());
        store.filename = path.clone();
        store.set_property("volume", 80);
        store.set_property("name", "Squall");
        store.save().unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"root": {"volume": 80, "name": "Squall"}})
        );
    }

    #[test]
    fn test_save_skips_empty_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");

        let mut store = ConfigStore::new(codec());
        store.filename = path.clone();
        store.save().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_save_rejects_nested_setting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");

        let mut store = ConfigStore::new(codec());
        store.filename = path.clone();
        store.set_property("list", Value::from(vec![Value::from(1)]));

        let err = store.save().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_flattens_root_objects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(
            &path,
            r#"{"root": {"volume": 80, "ratio": 0.5, "muted": false}, "version": 3}"#,
        )
        .unwrap();

        let mut store = ConfigStore::new(codec());
        store.set_filename(&path).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get_int("volume", 0), 80);
        assert_eq!(store.get_double("ratio", 0.0), 0.5);
        assert!(!store.get_bool("muted", true));
        assert!(!store.exists("version"));
    }

    #[test]
    fn test_load_keeps_settings_read_before_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"root": {"a": 1, "b": [1, 2], "c": 3}}"#).unwrap();

        let mut store = ConfigStore::new(codec());
        let err = store.set_filename(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(store.exists("a"));
        assert!(!store.exists("c"));
    }

    #[test]
    fn test_set_filename_overwrites_unsaved_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"root": {"volume": 10}}"#).unwrap();

        let mut store = ConfigStore::new(codec());
        store.set_property("volume", 99);
        store.set_property("scratch", true);
        store.set_filename(&path).unwrap();

        assert_eq!(store.get_int("volume", 0), 10);
        assert!(store.get_bool("scratch", false));
    }

    #[test]
    fn test_set_filename_to_missing_file_keeps_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");

        {
            let mut store = ConfigStore::new(codec());
            store.set_property("volume", 80);
            let err = store.set_filename(&path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FileAccess);
            assert!(store.exists("volume"));
        }

        assert!(path.exists());
        let store = ConfigStore::open(&path, codec()).unwrap();
        assert_eq!(store.get_int("volume", 0), 80);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ConfigStore::open(dir.path().join("absent.json"), codec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn test_drop_flushes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");

        {
            let mut store = ConfigStore::new(codec());
            store.filename = path.clone();
            store.set_property("volume", 80);
        }

        let store = ConfigStore::open(&path, codec()).unwrap();
        assert_eq!(store.get_int("volume", 0), 80);
    }
}
