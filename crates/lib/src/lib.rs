//! # metasync: Profile Retrieval & Canonicalization
//!
//! This crate holds the core pipeline for pulling Profile metadata out of an org and
//! turning it into source-format files:
//!
//! 1. [`retrieve::Retriever`] reads records in batches through a
//!    [`metadata::MetadataReader`] backend.
//! 2. [`normalize`] strips transport-only keys from every raw record.
//! 3. [`document::CanonicalDocument`] wraps the record under a namespaced root.
//! 4. [`xml`] renders it as indented XML.
//! 5. [`clean`] optionally removes environment-specific fields.
//! 6. [`storage::ProfileStore`] writes the result to disk.

pub mod clean;
pub mod constants;
pub mod document;
pub mod errors;
pub mod metadata;
pub mod normalize;
pub mod retrieve;
pub mod storage;
pub mod types;
pub mod xml;

pub use clean::{clean_profile, CleanConfig};
pub use document::CanonicalDocument;
pub use errors::{BuildError, MetadataError, RetrieveError, StorageError, XmlError};
pub use metadata::{MetadataReader, ReadResult};
pub use retrieve::Retriever;
pub use storage::ProfileStore;
pub use types::{
    BatchRetrieval, FailureReason, RetrievalFailure, RetrievalOutcome, RetrievalReport,
    RetrievedDocument,
};
