//! # Remote Metadata Access
//!
//! The seam between the retrieval pipeline and a concrete remote backend. Backends
//! (the SOAP client in `metasync-soap`, the in-memory mock in `metasync-test-utils`)
//! implement [`MetadataReader`].

pub mod traits;

pub use traits::{MetadataReader, ReadResult};
