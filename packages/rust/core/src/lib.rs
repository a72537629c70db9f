//! Document lookup and cached conversion for podlens.
//!
//! This crate ties a [`DocumentSource`] to the POD converter and two
//! TTL caches, so repeated lookups of the same document are cheap.

pub mod service;
pub mod source;

pub use service::{DocService, ServiceStats};
pub use source::{DocumentSource, FsSource, MemorySource};
