//! Appium server log filtering.
//!
//! Turns a raw, verbose session log into a short digest of the lines that
//! matter for diagnosing a failure: errors, failing HTTP exchanges, session
//! lifecycle events and driver diagnostics. Noise is dropped, oversized
//! payloads are shortened and repetitive lines are folded into counted
//! groups.
//!
//! Everything in this module is pure and synchronous. A run never fails;
//! when nothing is worth showing the outcome is
//! [`FilterOutcome::NothingMeaningful`].

pub mod classify;
pub mod config;
pub mod errors;
pub mod format;
pub mod group;
pub mod line;
pub mod normalize;
pub(crate) mod patterns;
pub mod pipeline;
pub mod session;
pub mod truncate;

pub use config::{FilterConfig, DEFAULT_SIMILARITY_THRESHOLD};
pub use group::{Group, SimilarityGrouper};
pub use line::{Level, LogLine};
pub use normalize::clean_log_line;
pub use pipeline::{
    filter_log, FilterOutcome, FilterReport, FilterStats, LogFilter, NOTHING_MEANINGFUL,
};

/// A stage that rewrites the line sequence in place.
///
/// Stages may drop, replace or insert lines; they never reorder the lines
/// they keep.
pub trait Transform {
    fn transform(&mut self, lines: &mut Vec<LogLine>);
}
