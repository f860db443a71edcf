// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture document tree and settings persistence crate.
//!
//! This crate provides a tagged value tree that can be written to and read back
//! from JSON and XML documents, and a flat, typed settings store persisted through
//! either format.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`Value`, `ValueType`, errors) and the `ConfigFile` contract
//! - **Ports**: Trait definitions that define interfaces (`ValueCodec`) and the injected `LogSink`
//! - **Adapters**: Codecs for specific wire formats (JSON, XML)
//! - **Service**: The file-backed settings store and the resource search path
//!
//! # Features
//!
//! - **Tagged Values**: Null, signed, unsigned, real, string, boolean, array and object nodes
//! - **Permissive Access**: Typed accessors return a zero value instead of failing
//! - **Two Codecs**: JSON through `serde_json`, XML through `quick-xml`
//! - **Settings Store**: Defaulted getters, upserts and save-on-drop persistence
//! - **Injected Logging**: Every codec and store reports to its own `tracing` dispatcher
//!
//! # Feature Flags
//!
//! - `json`: Enable the JSON codec (default)
//! - `xml`: Enable the XML codec (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use treecfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut root = Value::Null;
//! root["count"] = Value::from(42);
//! root["name"] = Value::from("Squall");
//!
//! let codec = JsonCodec::new();
//! let text = codec.serialize(&root)?;
//! let back = codec.deserialize(&text)?;
//!
//! assert_eq!(back["count"].get_int(), 42);
//! assert_eq!(back["name"].get_string(), "Squall");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ArrayList, ConfigFile, ErrorKind, ObjectMap, Result, TreeError, Value, ValueType,
    };
    pub use crate::ports::{Layout, LogSink, ValueCodec};
    pub use crate::service::{ConfigStore, SearchPath};

    // Re-export adapters based on feature flags
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonCodec;
    #[cfg(feature = "xml")]
    pub use crate::adapters::XmlCodec;
    #[cfg(feature = "json")]
    pub use crate::service::JsonConfigFile;
    #[cfg(feature = "xml")]
    pub use crate::service::XmlConfigFile;
}
