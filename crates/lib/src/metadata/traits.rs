use crate::errors::MetadataError;
use async_trait::async_trait;
use serde_json::Value;

/// The raw answer of one `read` call.
///
/// Remote clients hand back a bare record when a single name was requested and a list
/// otherwise. The orchestrator flattens both shapes right at the call boundary with
/// [`ReadResult::into_records`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResult {
    One(Value),
    Many(Vec<Value>),
}

impl ReadResult {
    /// Classifies a decoded response: an array is `Many`, anything else is `One`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => ReadResult::Many(items),
            other => ReadResult::One(other),
        }
    }

    /// The records as a uniform sequence. May contain `null` entries.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ReadResult::One(record) => vec![record],
            ReadResult::Many(records) => records,
        }
    }
}

/// A remote service able to read and list metadata records.
///
/// Implementations are called one request at a time and must not retry on their own.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Reads the records named `names` (at most [`crate::constants::BATCH_LIMIT`]).
    ///
    /// The order of the returned records usually follows `names` but callers must not
    /// rely on it. Unknown names may come back as `null` or as a record without a
    /// `fullName`.
    async fn read(&self, record_type: &str, names: &[String]) -> Result<ReadResult, MetadataError>;

    /// Lists the names of every record of `record_type` known to the remote service.
    async fn list(&self, record_type: &str) -> Result<Vec<String>, MetadataError>;
}
