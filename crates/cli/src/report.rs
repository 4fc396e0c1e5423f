//! Human-readable rendering of retrieval results.

use metasync::{RetrievalOutcome, RetrievalReport};

/// Formats one line per requested Profile followed by the totals line.
pub fn format_report(report: &RetrievalReport) -> String {
    let width = report
        .outcomes
        .iter()
        .map(|outcome| outcome.name().chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            RetrievalOutcome::Retrieved(doc) => {
                let target = doc
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not written)".to_string());
                format!("  ok    {:<width$}  {}", doc.name, target)
            }
            RetrievalOutcome::Failed(failure) => {
                format!("  FAIL  {:<width$}  {}", failure.name, failure.reason)
            }
        })
        .collect();

    lines.push(format_totals(report));
    lines.join("\n")
}

/// `N succeeded, M failed`.
pub fn format_totals(report: &RetrievalReport) -> String {
    format!(
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    )
}
