//! Configuration for the log filtering pipeline.

use serde::{Deserialize, Serialize};

/// Default Jaccard similarity above which routine lines are grouped.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Feature toggles for one filtering run.
///
/// Passed explicitly to every stage and never mutated while a run is in
/// progress, so independent runs cannot interfere with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Shorten oversized successful response payloads
    pub response_truncation: bool,
    /// Reserved; no stage branches on it yet
    pub stack_compression: bool,
    /// Replace the session setup span with a short excerpt
    pub session_compression: bool,
    /// Merge repeated and near-identical lines into counted groups
    pub http_grouping: bool,
    /// Drop routine success chatter unless it sits close to an error
    pub context_aware_filtering: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            response_truncation: true,
            stack_compression: true,
            session_compression: true,
            http_grouping: true,
            context_aware_filtering: true,
        }
    }
}

impl FilterConfig {
    /// Every feature switched off: only classification runs.
    pub fn minimal() -> Self {
        Self {
            response_truncation: false,
            stack_compression: false,
            session_compression: false,
            http_grouping: false,
            context_aware_filtering: false,
        }
    }
}
