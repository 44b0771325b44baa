//! End-to-end filtering run.
//!
//! ```text
//! split -> index errors -> compress session setup -> classify
//!       -> truncate responses -> group -> format
//! ```
//!
//! Every stage receives the configuration explicitly; nothing is shared
//! between runs.

use super::classify::Classifier;
use super::config::{FilterConfig, DEFAULT_SIMILARITY_THRESHOLD};
use super::errors::ErrorIndex;
use super::format::format_group;
use super::group::SimilarityGrouper;
use super::line::split_lines;
use super::session::SessionCompressor;
use super::truncate::ResponseTruncator;
use super::Transform;
use serde::Serialize;
use std::time::Instant;

/// Shown when nothing survives filtering.
pub const NOTHING_MEANINGFUL: &str = "No meaningful logs found after filtering.";

/// Result of a run: the filtered text or the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Filtered(String),
    NothingMeaningful,
}

impl FilterOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            FilterOutcome::Filtered(text) => Some(text),
            FilterOutcome::NothingMeaningful => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            FilterOutcome::Filtered(text) => Some(text),
            FilterOutcome::NothingMeaningful => None,
        }
    }
}

/// Counters collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterStats {
    pub original_lines: usize,
    pub filtered_lines: usize,
    /// Percentage of lines removed, rounded to one decimal
    pub reduction_percent: f64,
    pub error_lines: usize,
    pub session_lines_removed: usize,
    pub lines_dropped: usize,
    pub lines_truncated: usize,
    pub groups: usize,
    pub processing_ms: f64,
}

impl FilterStats {
    fn finish(&mut self, content: &str, outcome: &FilterOutcome) {
        self.original_lines = count_lines(content);
        self.filtered_lines = outcome.text().map(count_lines).unwrap_or(0);
        self.reduction_percent = reduction(self.original_lines, self.filtered_lines);
    }
}

/// Outcome plus the counters of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub outcome: FilterOutcome,
    pub stats: FilterStats,
}

/// A configured filtering run.
#[derive(Debug, Clone, Copy)]
pub struct LogFilter {
    config: FilterConfig,
    threshold: f64,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl LogFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Jaccard similarity required to merge routine lines.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Filter a complete log buffer.
    pub fn run(&self, content: &str) -> FilterReport {
        let started = Instant::now();
        let mut stats = FilterStats::default();

        let mut lines = split_lines(content);
        tracing::debug!(lines = lines.len(), "split input");

        let mut errors = ErrorIndex::scan(&lines);
        stats.error_lines = errors.len();
        tracing::debug!(errors = errors.len(), "indexed error lines");

        let compressed = {
            let mut compressor = SessionCompressor::new(self.config);
            compressor.transform(&mut lines);
            stats.session_lines_removed = compressor.removed_count();
            compressor.span().is_some()
        };
        if compressed {
            // Proximity is measured on the sequence the classifier sees.
            errors = ErrorIndex::scan(&lines);
        }

        let mut classifier = Classifier::new(self.config, &errors);
        classifier.transform(&mut lines);
        stats.lines_dropped = classifier.dropped_count();
        tracing::debug!(
            retained = lines.len(),
            dropped = stats.lines_dropped,
            "classified lines"
        );

        let mut truncator = ResponseTruncator::new(self.config);
        truncator.transform(&mut lines);
        stats.lines_truncated = truncator.truncated_count();
        tracing::debug!(truncated = stats.lines_truncated, "truncated responses");

        let groups = SimilarityGrouper::new(self.config, self.threshold).group(lines);
        stats.groups = groups.len();

        let output = groups.iter().map(format_group).collect::<Vec<_>>().join("\n");
        let output = output.trim();
        let outcome = if output.is_empty() {
            FilterOutcome::NothingMeaningful
        } else {
            FilterOutcome::Filtered(output.to_string())
        };

        stats.finish(content, &outcome);
        stats.processing_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(
            original = stats.original_lines,
            filtered = stats.filtered_lines,
            reduction = stats.reduction_percent,
            "filtering finished"
        );

        FilterReport { outcome, stats }
    }
}

/// Filter `content`, returning `None` when nothing meaningful remains.
pub fn filter_log(content: &str, config: &FilterConfig, threshold: f64) -> Option<String> {
    LogFilter::new(*config)
        .with_threshold(threshold)
        .run(content)
        .outcome
        .into_text()
}

fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

fn reduction(original: usize, filtered: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let removed = original.saturating_sub(filtered) as f64;
    (removed / original as f64 * 1000.0).round() / 10.0
}
