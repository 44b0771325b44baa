//! Session setup compression.
//!
//! Between "Session created with session id" and the first subsequent
//! "session created successfully" line, drivers print long runs of
//! capability and environment chatter. When that span is long enough it is
//! replaced by its critical lines, its error lines and at most two summary
//! lines.
//!
//! Every span line lands in at most one part of the excerpt. Failures win
//! over capability notices, which are only summarized.

use super::config::FilterConfig;
use super::line::LogLine;
use super::patterns::{
    self, CAPABILITY_NAME, CAPABILITY_NOTICE, SESSION_READY, SESSION_START, SETUP_CRITICAL,
    SETUP_WARNING, SPAN_ERROR,
};
use super::Transform;

/// Spans shorter than this are left alone.
const MIN_SPAN_LENGTH: usize = 5;

/// Capability names listed in the summary line.
const MAX_NAMED_CAPABILITIES: usize = 3;

/// Bounds of the session setup region, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupSpan {
    pub start: usize,
    pub end: usize,
}

impl SetupSpan {
    /// Locate the first compressible span, if any.
    pub fn find(lines: &[LogLine]) -> Option<Self> {
        let start = lines
            .iter()
            .position(|line| patterns::is_match(&SESSION_START, &line.raw))?;
        let end = start
            + 1
            + lines[start + 1..]
                .iter()
                .position(|line| patterns::is_match(&SESSION_READY, &line.raw))?;

        (end - start >= MIN_SPAN_LENGTH).then_some(Self { start, end })
    }
}

/// Replaces the session setup span with a curated excerpt.
pub struct SessionCompressor {
    config: FilterConfig,
    span: Option<SetupSpan>,
    removed: usize,
}

impl SessionCompressor {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            span: None,
            removed: 0,
        }
    }

    /// The span compressed by the last transform, if any.
    pub fn span(&self) -> Option<SetupSpan> {
        self.span
    }

    /// Net number of lines the last transform removed.
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    fn excerpt(&self, setup: &[LogLine]) -> Vec<String> {
        let mut critical = Vec::new();
        let mut errors = Vec::new();
        let mut capabilities = Vec::new();
        let mut warnings = 0;

        for line in setup {
            let raw = line.raw.as_str();
            let failure = patterns::is_match(&SPAN_ERROR, raw);

            if !failure && patterns::is_match(&SETUP_WARNING, raw) {
                warnings += 1;
            }

            if failure {
                errors.push(raw.to_string());
            } else if patterns::is_match(&CAPABILITY_NOTICE, raw) {
                capabilities.push(raw);
            } else if patterns::is_match(&SETUP_CRITICAL, raw) {
                critical.push(raw.to_string());
            }
        }

        let prefix = setup
            .first()
            .and_then(LogLine::timestamp)
            .map(|ts| format!("{ts} - "))
            .unwrap_or_default();

        let mut excerpt = critical;
        excerpt.append(&mut errors);
        if !capabilities.is_empty() {
            excerpt.push(format!(
                "{prefix}[SUMMARY] {} capability warning(s): {}",
                capabilities.len(),
                capability_list(&capabilities)
            ));
        }
        if warnings > capabilities.len() {
            excerpt.push(format!(
                "{prefix}[SUMMARY] {} additional warning(s)",
                warnings - capabilities.len()
            ));
        }
        excerpt
    }
}

impl Transform for SessionCompressor {
    fn transform(&mut self, lines: &mut Vec<LogLine>) {
        self.span = None;
        self.removed = 0;
        if !self.config.session_compression {
            return;
        }
        let Some(span) = SetupSpan::find(lines) else {
            return;
        };

        let excerpt = self.excerpt(&lines[span.start..=span.end]);
        let span_len = span.end - span.start + 1;
        self.removed = span_len.saturating_sub(excerpt.len());
        tracing::debug!(
            start = span.start,
            end = span.end,
            kept = excerpt.len(),
            "compressed session setup span"
        );

        let after = lines.split_off(span.end + 1);
        lines.truncate(span.start);
        lines.extend(excerpt.into_iter().map(|raw| LogLine::new(0, raw)));
        lines.extend(after);
        for (index, line) in lines.iter_mut().enumerate() {
            line.index = index;
        }

        self.span = Some(span);
    }
}

/// Distinct capability names, at most three, joined for the summary line.
/// ` ...` follows when there are more than three capability lines.
fn capability_list(lines: &[&str]) -> String {
    let mut names: Vec<String> = Vec::new();
    for raw in lines {
        let name = capability_name(raw);
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let more = lines.len() > MAX_NAMED_CAPABILITIES;
    names.truncate(MAX_NAMED_CAPABILITIES);
    let mut list = names.join(", ");
    if more {
        list.push_str(" ...");
    }
    list
}

/// The quoted token or identifier following "capability".
fn capability_name(raw: &str) -> String {
    patterns::captures(&CAPABILITY_NAME, raw)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "capability".to_string())
}
