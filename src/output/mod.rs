//! Output module for batch reports
//!
//! This module handles:
//! - Deriving statistics from batch reports
//! - Printing statistics to the terminal
//! - Generating markdown summaries for files and email bodies

mod markdown;
pub mod stats;

pub use markdown::{format_batch_summary, write_batch_summary};
pub use stats::{print_statistics, BatchStatistics};
