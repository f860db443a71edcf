// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the interfaces the rest of the crate is written against:
//! the codec contract implemented by the adapters, and the logging collaborator
//! injected into codecs and stores.

pub mod codec;
pub mod logger;

// Re-export commonly used types
pub use codec::{encode, Layout, NodeEncoder, ValueCodec, MAX_DOCUMENT_SIZE};
pub use logger::LogSink;
