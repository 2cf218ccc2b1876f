//! Console and JSON rendering of a [`MatchReport`].

use std::time::Duration;

use crate::error::{MatchError, Result};
use crate::pipeline::coordinator::MatchReport;

/// Render the report as human-readable text.
///
/// Documents are listed by descending score, then id, followed by the best
/// candidate(s) and the run timings.
pub fn render_text(report: &MatchReport) -> String {
    let mut lines: Vec<String> = report
        .scores
        .ranked()
        .into_iter()
        .map(|(id, score)| format!("{id}: {score:.2}% matching rate"))
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Best candidate(s) with a matching rate of {:.2}%:",
        report.best.score
    ));
    lines.extend(report.best.documents.iter().map(|id| format!("- {id}")));

    let summary = &report.summary;
    lines.push(String::new());
    lines.push(format!(
        "{} document(s), {} extraction failure(s), {} batch(es), {} worker(s)",
        summary.documents, summary.extraction_failures, summary.batches, summary.workers
    ));
    lines.push(format!("Loading time: {}", seconds(summary.load)));
    lines.push(format!("Analysis time: {}", seconds(summary.analyze)));
    lines.push(format!("Total time: {}", seconds(summary.total)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`MatchError::Pipeline`] if serialization fails.
pub fn render_json(report: &MatchReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| MatchError::Pipeline(format!("failed to serialize report: {e}")))
}

fn seconds(duration: Duration) -> String {
    format!("{:.2} seconds", duration.as_secs_f64())
}
