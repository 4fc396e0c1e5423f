//! # Batch Retrieval
//!
//! Reads records through a [`MetadataReader`] in batches of at most
//! [`BATCH_LIMIT`] names, turns every returned record into a rendered document and
//! reconciles the result against the requested names.
//!
//! Calls are issued one after another, in request order. A failed call aborts the
//! whole retrieval; a record that fails to build only fails its own outcome.

use crate::clean::{clean_profile, CleanConfig};
use crate::constants::BATCH_LIMIT;
use crate::document::{record_identifier, CanonicalDocument};
use crate::errors::{BuildError, RetrieveError};
use crate::metadata::MetadataReader;
use crate::types::{
    BatchRetrieval, FailureReason, RetrievalFailure, RetrievalOutcome, RetrievalReport,
    RetrievedDocument,
};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Splits `names` into contiguous batches of at most `size` names, keeping order.
pub fn partition(names: &[String], size: usize) -> impl Iterator<Item = &[String]> {
    names.chunks(size.max(1))
}

/// Orchestrates batched reads for one record type.
pub struct Retriever {
    reader: Arc<dyn MetadataReader>,
    record_type: String,
    clean: Option<CleanConfig>,
}

impl Retriever {
    /// Creates a retriever that renders documents without cleaning them.
    pub fn new(reader: Arc<dyn MetadataReader>, record_type: impl Into<String>) -> Self {
        Self {
            reader,
            record_type: record_type.into(),
            clean: None,
        }
    }

    /// Cleans every rendered document with `config`.
    pub fn with_clean(mut self, config: CleanConfig) -> Self {
        self.clean = Some(config);
        self
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Issues one remote call per batch and builds a document for every usable record.
    ///
    /// `null` entries and entries without a `fullName` are skipped here; they surface
    /// as `NotFound` during [`reconcile`].
    pub async fn fetch(&self, names: &[String]) -> Result<BatchRetrieval, RetrieveError> {
        let mut batch_result = BatchRetrieval::default();

        for (index, batch) in partition(names, BATCH_LIMIT).enumerate() {
            debug!(
                "Reading batch {} ({} names) of type {}",
                index + 1,
                batch.len(),
                self.record_type
            );
            let records = self
                .reader
                .read(&self.record_type, batch)
                .await
                .map_err(|source| RetrieveError::Call {
                    batch: index + 1,
                    source,
                })?
                .into_records();
            batch_result.calls += 1;

            for record in records {
                let Some(name) = record_identifier(&record).map(str::to_string) else {
                    debug!("Skipping an entry without `fullName` in batch {}", index + 1);
                    continue;
                };
                match self.render(&record) {
                    Ok(xml) => batch_result.retrieved.push(RetrievedDocument {
                        name,
                        xml,
                        path: None,
                    }),
                    Err(e) => {
                        warn!("Failed to build document for '{}': {}", name, e);
                        batch_result.failed.push(RetrievalFailure {
                            name,
                            reason: FailureReason::Build(e.to_string()),
                        });
                    }
                }
            }
        }

        info!(
            "Read {} {} record(s) in {} call(s), {} failed to build",
            batch_result.retrieved.len(),
            self.record_type,
            batch_result.calls,
            batch_result.failed.len()
        );
        Ok(batch_result)
    }

    /// Fetches `names` and returns one outcome per requested identifier.
    pub async fn retrieve(&self, names: &[String]) -> Result<RetrievalReport, RetrieveError> {
        let batch_result = self.fetch(names).await?;
        Ok(reconcile(names, batch_result))
    }

    /// Lists every remote record of this type and retrieves them all.
    pub async fn retrieve_all(&self) -> Result<RetrievalReport, RetrieveError> {
        let mut names = self
            .reader
            .list(&self.record_type)
            .await
            .map_err(RetrieveError::List)?;
        names.sort();
        info!("Found {} remote {} record(s)", names.len(), self.record_type);
        self.retrieve(&names).await
    }

    fn render(&self, record: &Value) -> Result<String, BuildError> {
        let document = CanonicalDocument::from_record(&self.record_type, record)?;
        let xml = document.to_xml()?;
        match &self.clean {
            Some(config) if !config.is_noop() => Ok(clean_profile(&xml, config)?),
            _ => Ok(xml),
        }
    }
}

/// Builds the final outcome set for a request.
///
/// Retrieved documents come first in retrieval order, then build failures, then one
/// `NotFound` per requested name missing from both, in request order. Missing names
/// are found by set difference, never by position.
pub fn reconcile(requested: &[String], batch_result: BatchRetrieval) -> RetrievalReport {
    let mut seen: HashSet<String> = batch_result
        .retrieved
        .iter()
        .map(|doc| doc.name.clone())
        .chain(batch_result.failed.iter().map(|f| f.name.clone()))
        .collect();

    let mut outcomes: Vec<RetrievalOutcome> = batch_result
        .retrieved
        .into_iter()
        .map(RetrievalOutcome::Retrieved)
        .chain(batch_result.failed.into_iter().map(RetrievalOutcome::Failed))
        .collect();

    for name in requested {
        if seen.insert(name.clone()) {
            debug!("'{}' was requested but not returned", name);
            outcomes.push(RetrievalOutcome::Failed(RetrievalFailure {
                name: name.clone(),
                reason: FailureReason::NotFound,
            }));
        }
    }

    RetrievalReport { outcomes }
}
