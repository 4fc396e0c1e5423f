//! # Batch Retrieval Tests
//!
//! Drives the `Retriever` against the in-memory `MockMetadataReader`.

use anyhow::Result;
use metasync::constants::{BATCH_LIMIT, PROFILE_TYPE};
use metasync::{
    CleanConfig, FailureReason, ReadResult, RetrievalOutcome, RetrieveError, Retriever,
};
use metasync_test_utils::{profile_record, MockMetadataReader};
use serde_json::{json, Value};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Profile{i:02}")).collect()
}

fn retriever(reader: &MockMetadataReader) -> Retriever {
    Retriever::new(Arc::new(reader.clone()), PROFILE_TYPE)
}

#[tokio::test]
async fn test_batches_follow_request_order() -> Result<()> {
    setup_tracing();
    for (count, expected_sizes) in [
        (0usize, vec![]),
        (10, vec![10]),
        (13, vec![10, 3]),
        (15, vec![10, 5]),
    ] {
        // --- 1. Arrange ---
        let requested = names(count);
        let refs: Vec<&str> = requested.iter().map(String::as_str).collect();
        let reader = MockMetadataReader::new().with_profiles(&refs);

        // --- 2. Act ---
        let report = retriever(&reader).retrieve(&requested).await?;

        // --- 3. Assert ---
        let calls = reader.get_calls();
        let sizes: Vec<usize> = calls.iter().map(|(_, batch)| batch.len()).collect();
        assert_eq!(sizes, expected_sizes, "batch sizes for {count} names");
        assert!(calls.iter().all(|(t, b)| t == PROFILE_TYPE && b.len() <= BATCH_LIMIT));
        let replayed: Vec<String> = calls.into_iter().flat_map(|(_, batch)| batch).collect();
        assert_eq!(replayed, requested);

        assert_eq!(report.outcomes.len(), count);
        assert_eq!(report.succeeded(), count);
        let order: Vec<&str> = report.outcomes.iter().map(RetrievalOutcome::name).collect();
        assert_eq!(order, refs);
    }
    Ok(())
}

#[tokio::test]
async fn test_documents_are_canonical() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new().with_profiles(&["Admin"]);

    let report = retriever(&reader).retrieve(&["Admin".to_string()]).await?;

    let doc = report.documents().next().expect("one document");
    assert_eq!(doc.name, "Admin");
    assert!(doc.xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Profile xmlns=\"http://soap.sforce.com/2006/04/metadata\">"));
    assert!(!doc.xml.contains("fullName"));
    assert!(!doc.xml.contains("xsi:type"));
    assert!(doc.xml.contains("    <description/>\n"));
    // Without cleaning every field survives.
    assert!(doc.xml.contains("<loginIpRanges>"));
    assert!(doc.xml.contains("<userLicense>Salesforce</userLicense>"));
    Ok(())
}

#[tokio::test]
async fn test_cleaning_is_applied_to_retrieved_documents() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new().with_profiles(&["Admin"]);
    let config = CleanConfig {
        login_hours: false,
        ..CleanConfig::default()
    };

    let report = retriever(&reader)
        .with_clean(config)
        .retrieve(&["Admin".to_string()])
        .await?;

    let doc = report.documents().next().expect("one document");
    assert!(!doc.xml.contains("loginIpRanges"));
    assert!(!doc.xml.contains("userLicense"));
    assert!(doc.xml.contains("<loginHours>"));
    assert!(doc.xml.contains("<fieldPermissions>"));
    Ok(())
}

#[tokio::test]
async fn test_null_entries_are_skipped() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new();
    reader.push_response(ReadResult::Many(vec![Value::Null, profile_record("Standard")]));
    let requested = vec!["Ghost".to_string(), "Standard".to_string()];

    let batch_result = retriever(&reader).fetch(&requested).await?;

    assert_eq!(batch_result.calls, 1);
    assert_eq!(batch_result.retrieved.len(), 1);
    assert_eq!(batch_result.retrieved[0].name, "Standard");
    assert!(batch_result.failed.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_and_malformed_entries_become_not_found() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new()
        .with_profiles(&["A", "C"])
        .with_empty_missing();
    let requested: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();

    let report = retriever(&reader).retrieve(&requested).await?;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    let documents: Vec<&str> = report.documents().map(|d| d.name.as_str()).collect();
    assert_eq!(documents, vec!["A", "C"]);
    let failure = report.failures().next().expect("one failure");
    assert_eq!(failure.name, "B");
    assert_eq!(failure.reason, FailureReason::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_singleton_response_is_accepted() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new();
    reader.push_response(ReadResult::One(profile_record("Solo")));

    let report = retriever(&reader).retrieve(&["Solo".to_string()]).await?;

    assert_eq!(report.succeeded(), 1);
    Ok(())
}

#[tokio::test]
async fn test_build_failure_is_scoped_to_one_record() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new();
    reader.push_response(ReadResult::Many(vec![
        json!({ "fullName": "Bad", "not a tag": "true" }),
        profile_record("Good"),
    ]));
    let requested = vec!["Bad".to_string(), "Good".to_string()];

    let report = retriever(&reader).retrieve(&requested).await?;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    let failure = report.failures().next().expect("one failure");
    assert_eq!(failure.name, "Bad");
    assert!(matches!(&failure.reason, FailureReason::Build(msg) if msg.contains("not a tag")));
    Ok(())
}

#[tokio::test]
async fn test_identifier_must_be_a_string() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new();
    reader.push_response(ReadResult::Many(vec![
        json!({ "fullName": { "nested": "x" }, "custom": "true" }),
    ]));

    let report = retriever(&reader).retrieve(&["Odd".to_string()]).await?;

    assert_eq!(report.failures().next().map(|f| &f.reason), Some(&FailureReason::NotFound));
    Ok(())
}

#[tokio::test]
async fn test_call_failure_aborts_retrieval() {
    setup_tracing();
    let requested = names(25);
    let refs: Vec<&str> = requested.iter().map(String::as_str).collect();
    let reader = MockMetadataReader::new().with_profiles(&refs).fail_on_call(2);

    let result = retriever(&reader).retrieve(&requested).await;

    match result {
        Err(RetrieveError::Call { batch, .. }) => assert_eq!(batch, 2),
        other => panic!("Expected a call failure, got {other:?}"),
    }
    // The third batch is never requested.
    assert_eq!(reader.get_calls().len(), 2);
}

#[tokio::test]
async fn test_retrieve_all_lists_then_reads() -> Result<()> {
    setup_tracing();
    let reader = MockMetadataReader::new().with_profiles(&["Zeta", "Alpha", "Mid"]);

    let report = retriever(&reader).retrieve_all().await?;

    let order: Vec<&str> = report.outcomes.iter().map(RetrievalOutcome::name).collect();
    assert_eq!(order, vec!["Alpha", "Mid", "Zeta"]);
    assert_eq!(reader.get_calls().len(), 1);
    Ok(())
}
