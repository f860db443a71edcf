// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the document tree and core types.
//!
//! This module contains the tagged value tree, its iteration, the error types and
//! the configuration file contract. It is independent of any wire format.

pub mod errors;
pub mod iter;
pub mod service;
pub mod value;

// Re-export commonly used types
pub use errors::{ErrorKind, Result, TreeError};
pub use iter::Iter;
pub use service::ConfigFile;
pub use value::{ArrayList, ObjectMap, Value, ValueType};
