//! Oversized successful response truncation.
//!
//! Large `200` payload echoes (page sources, element trees) rarely matter
//! when the command succeeded. Their JSON tail is cut down to a short
//! preview followed by the number of characters that were dropped.

use super::config::FilterConfig;
use super::line::LogLine;
use super::patterns::{
    self, DEBUG_VALUE_RESPONSE, HTTP_FAILURE_RESPONSE, HTTP_OK_BODY, JSON_TAIL, Pattern,
    TRUNCATION_GUARD, VALUE_TAIL,
};
use super::Transform;

/// Lines shorter than this are never truncated.
const MIN_LINE_CHARS: usize = 500;
/// Inbound HTTP responses are only considered past this length.
const MIN_HTTP_RESPONSE_CHARS: usize = 1000;
/// A JSON tail must exceed this to be cut.
const MAX_TAIL_CHARS: usize = 500;
/// Characters of the tail kept as a preview.
const PREVIEW_CHARS: usize = 200;

/// Decide whether `line` carries an oversized payload and, if so, return
/// the shortened line. `None` means the line is kept as is.
pub fn truncate_response(line: &str, config: &FilterConfig) -> Option<String> {
    if !config.response_truncation {
        return None;
    }
    if patterns::is_match(&TRUNCATION_GUARD, line)
        || patterns::is_match(&HTTP_FAILURE_RESPONSE, line)
    {
        return None;
    }

    let length = line.chars().count();
    if length < MIN_LINE_CHARS {
        return None;
    }

    if patterns::is_match(&DEBUG_VALUE_RESPONSE, line) {
        if let Some(truncated) = cut_tail(line, &VALUE_TAIL) {
            return Some(truncated);
        }
    }

    if patterns::is_match(&HTTP_OK_BODY, line) && length > MIN_HTTP_RESPONSE_CHARS {
        return cut_tail(line, &JSON_TAIL);
    }

    None
}

/// Replace the first capture group of `tail` with a preview and a count.
fn cut_tail(line: &str, tail: &Pattern) -> Option<String> {
    let caps = patterns::captures(tail, line)?;
    let body = caps.get(1)?;
    let body_chars = body.as_str().chars().count();
    if body_chars <= MAX_TAIL_CHARS {
        return None;
    }

    let preview: String = body.as_str().chars().take(PREVIEW_CHARS).collect();
    Some(format!(
        "{}{}... [{} chars truncated]{}",
        &line[..body.start()],
        preview,
        body_chars,
        &line[body.end()..]
    ))
}

/// Applies [`truncate_response`] to every retained line.
pub struct ResponseTruncator {
    config: FilterConfig,
    truncated: usize,
}

impl ResponseTruncator {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            truncated: 0,
        }
    }

    /// Number of lines shortened by the last transform.
    pub fn truncated_count(&self) -> usize {
        self.truncated
    }
}

impl Transform for ResponseTruncator {
    fn transform(&mut self, lines: &mut Vec<LogLine>) {
        self.truncated = 0;
        for line in lines.iter_mut() {
            if let Some(shorter) = truncate_response(&line.raw, &self.config) {
                *line = line.with_raw(shorter);
                self.truncated += 1;
            }
        }
    }
}
