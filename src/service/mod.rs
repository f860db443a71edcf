// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer built on top of the codecs.
//!
//! This module contains the file-backed implementation of the `ConfigFile`
//! trait and the resource search path resolver.

pub mod config_store;
pub mod search_path;

// Re-export commonly used types
pub use config_store::{ConfigStore, ROOT_KEY};
#[cfg(feature = "json")]
pub use config_store::JsonConfigFile;
#[cfg(feature = "xml")]
pub use config_store::XmlConfigFile;
pub use search_path::SearchPath;
