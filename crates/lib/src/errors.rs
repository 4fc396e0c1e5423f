use thiserror::Error;

/// Errors raised while reading or writing XML text.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Failed to write XML: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML processing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed XML document: {0}")]
    Malformed(String),
    #[error("`{0}` is not a valid XML name")]
    InvalidName(String),
    #[error("Rendered XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while turning one remote record into a canonical document.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Record has no `{0}` field")]
    MissingIdentifier(&'static str),
    #[error("Record is not a structured value")]
    NotARecord,
    #[error("Failed to render document: {0}")]
    Render(#[from] XmlError),
}

/// Errors raised by a remote metadata backend.
///
/// Each backend maps its own errors (HTTP, SOAP faults, ...) into these variants so the
/// orchestrator can handle every backend the same way.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("The remote call failed: {0}")]
    Call(String),

    #[error("The remote service rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to decode the remote response: {0}")]
    Decode(String),

    #[error("At most {limit} names can be read per call, got {requested}")]
    TooManyNames { limit: usize, requested: usize },
}

/// Errors that abort a whole retrieval.
#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("Remote call for batch {batch} failed: {source}")]
    Call {
        batch: usize,
        #[source]
        source: MetadataError,
    },
    #[error("Failed to list remote records: {0}")]
    List(#[source] MetadataError),
}

/// Errors raised by the on-disk profile store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
