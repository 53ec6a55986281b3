//! Statistics derived from a batch report

use crate::crawler::{BatchReport, FailureKind};
use std::collections::HashMap;

/// Batch statistics summary
#[derive(Debug, Clone)]
pub struct BatchStatistics {
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed_seconds: f64,

    /// Failure counts by kind
    pub failures_by_kind: HashMap<FailureKind, usize>,

    /// HTTP status codes seen in failures, with counts
    pub http_statuses: HashMap<u16, usize>,
}

impl BatchStatistics {
    pub fn from_report(report: &BatchReport) -> Self {
        let mut failures_by_kind = HashMap::new();
        let mut http_statuses = HashMap::new();

        for outcome in &report.results {
            if let Some(kind) = outcome.failure_kind() {
                *failures_by_kind.entry(kind).or_insert(0) += 1;
            }
            if let Some(status) = outcome.http_status_code() {
                *http_statuses.entry(status).or_insert(0) += 1;
            }
        }

        Self {
            total_urls: report.total_urls,
            successful: report.successful,
            failed: report.failed,
            elapsed_seconds: report.elapsed_seconds,
            failures_by_kind,
            http_statuses,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        (self.successful as f64 / self.total_urls as f64) * 100.0
    }

    /// Failure kinds sorted by count (descending), then name
    pub fn sorted_failures(&self) -> Vec<(FailureKind, usize)> {
        let mut counts: Vec<_> = self
            .failures_by_kind
            .iter()
            .map(|(kind, count)| (*kind, *count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        counts
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &BatchStatistics) {
    println!("=== Batch Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", stats.total_urls);
    println!("  Successful: {}", stats.successful);
    println!("  Failed: {}", stats.failed);
    println!("  Elapsed: {:.2}s", stats.elapsed_seconds);
    println!();

    if !stats.failures_by_kind.is_empty() {
        println!("Failures by Kind:");
        for (kind, count) in stats.sorted_failures() {
            println!("  {}: {}", kind.as_str(), count);
        }
        println!();
    }

    if !stats.http_statuses.is_empty() {
        println!("HTTP Statuses:");
        let mut statuses: Vec<_> = stats.http_statuses.iter().collect();
        statuses.sort();
        for (status, count) in statuses {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs fetched)",
        stats.success_rate(),
        stats.successful,
        stats.total_urls
    );
}
