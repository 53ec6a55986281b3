//! Markdown summary generation
//!
//! Renders a batch report as human-readable markdown, suitable for writing to
//! disk or using as an email body.

use crate::crawler::{BatchReport, FetchOutcome};
use crate::output::stats::BatchStatistics;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest payload excerpt included per successful URL
const EXCERPT_CHARS: usize = 280;

/// Writes a markdown summary of `report` to `output_path`
pub fn write_batch_summary(report: &BatchReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_batch_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch report as markdown
pub fn format_batch_summary(report: &BatchReport) -> String {
    let stats = BatchStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Crawl Batch Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.elapsed_seconds
    ));
    md.push_str(&format!("- **Total URLs**: {}\n", report.total_urls));
    md.push_str(&format!("- **Successful**: {}\n", report.successful));
    md.push_str(&format!("- **Failed**: {}\n", report.failed));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    if !stats.failures_by_kind.is_empty() {
        md.push_str("## Failures by Kind\n\n");
        md.push_str("| Kind | Count |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in stats.sorted_failures() {
            md.push_str(&format!("| {} | {} |\n", kind.as_str(), count));
        }
        md.push('\n');
    }

    md.push_str("## Results\n\n");
    for (idx, outcome) in report.results.iter().enumerate() {
        md.push_str(&format_outcome(idx + 1, outcome));
    }

    md
}

fn format_outcome(position: usize, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Success { data } => {
            let label = data
                .get("url")
                .and_then(|v| v.as_str())
                .unwrap_or("(url not reported)");
            let mut line = format!("{}. ✓ {}\n", position, label);
            if let Some(title) = data.get("title").and_then(|v| v.as_str()) {
                line.push_str(&format!("   - Title: {}\n", title));
            }
            if let Some(excerpt) = excerpt(data) {
                line.push_str(&format!("   - Excerpt: {}\n", excerpt));
            }
            line
        }
        FetchOutcome::Failure {
            error,
            url,
            message,
            ..
        } => format!(
            "{}. ✗ {} ({}: {})\n",
            position,
            url.as_deref().unwrap_or("(invalid input)"),
            error.as_str(),
            message
        ),
    }
}

/// First text-like field of the payload, shortened
fn excerpt(data: &serde_json::Value) -> Option<String> {
    let text = ["content", "text", "markdown"]
        .iter()
        .find_map(|key| data.get(*key).and_then(|v| v.as_str()))?;

    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        Some(flat)
    } else {
        Some(format!(
            "{}…",
            flat.chars().take(EXCERPT_CHARS).collect::<String>()
        ))
    }
}
