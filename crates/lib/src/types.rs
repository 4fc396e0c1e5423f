use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A record that was read and rendered successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievedDocument {
    /// The record identifier (`fullName`).
    pub name: String,
    /// The rendered (and possibly cleaned) XML text.
    pub xml: String,
    /// Where the document was written, once it has been persisted.
    pub path: Option<PathBuf>,
}

/// Why a requested record did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The record was not part of any response, or came back without a `fullName`.
    NotFound,
    /// The record was returned but could not be turned into a document.
    Build(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::Build(msg) => write!(f, "build failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalFailure {
    pub name: String,
    pub reason: FailureReason,
}

/// The outcome for one requested identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalOutcome {
    Retrieved(RetrievedDocument),
    Failed(RetrievalFailure),
}

impl RetrievalOutcome {
    pub fn name(&self) -> &str {
        match self {
            RetrievalOutcome::Retrieved(doc) => &doc.name,
            RetrievalOutcome::Failed(failure) => &failure.name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetrievalOutcome::Retrieved(_))
    }
}

/// What the batch calls produced, before reconciliation against the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRetrieval {
    /// Documents in per-batch response order, batches in issuance order.
    pub retrieved: Vec<RetrievedDocument>,
    /// Records that were returned but failed to build.
    pub failed: Vec<RetrievalFailure>,
    /// Number of remote calls issued.
    pub calls: usize,
}

/// One outcome per requested identifier, plus aggregate counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetrievalReport {
    pub outcomes: Vec<RetrievalOutcome>,
}

impl RetrievalReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn documents(&self) -> impl Iterator<Item = &RetrievedDocument> {
        self.outcomes.iter().filter_map(|o| match o {
            RetrievalOutcome::Retrieved(doc) => Some(doc),
            RetrievalOutcome::Failed(_) => None,
        })
    }

    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut RetrievedDocument> {
        self.outcomes.iter_mut().filter_map(|o| match o {
            RetrievalOutcome::Retrieved(doc) => Some(doc),
            RetrievalOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &RetrievalFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            RetrievalOutcome::Failed(failure) => Some(failure),
            RetrievalOutcome::Retrieved(_) => None,
        })
    }
}
