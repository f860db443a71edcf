// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing codec implementations.
//!
//! This module contains concrete implementations of the `ValueCodec` trait
//! defined in the ports layer, one per wire format. Each codec is gated behind a
//! cargo feature of the same name.

#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "xml")]
pub mod xml;

// Re-export adapters based on feature flags
#[cfg(feature = "json")]
pub use json::JsonCodec;
#[cfg(feature = "xml")]
pub use xml::{XmlCodec, XmlDeclaration, XmlDocument, XmlElement, XmlNode};
