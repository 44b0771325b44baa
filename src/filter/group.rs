//! Similarity grouping of retained lines.
//!
//! Lines are scanned left to right. Each line not yet consumed anchors a
//! group, and every later unconsumed line that matches the anchor under the
//! rules below joins it:
//!
//! - **Critical pairs** (errors, identifying request bodies, 4xx/5xx
//!   responses, stack frames, W3C error signatures) only merge when they are
//!   provably the same event: identical request+body, the same element id,
//!   or an identical pattern within a few lines.
//! - **Mixed pairs** never merge.
//! - **Routine pairs** merge on identical patterns or on token-set Jaccard
//!   similarity at or above the threshold.
//!
//! Every pair is compared at most once, so grouping is `O(n²)` in the number
//! of retained lines; per-line work (normalization, token sets, criticality,
//! element ids) is done once up front.

use super::config::{FilterConfig, DEFAULT_SIMILARITY_THRESHOLD};
use super::line::LogLine;
use super::normalize::clean_log_line;
use super::patterns::{
    self, ANY_HTTP_FAILURE, ANY_HTTP_REQUEST, BASIC_ERROR, BODY_FIELD, ELEMENT_ID,
    IDENTIFYING_FIELD, JSON_IDENTIFIER, NOT_FOUND_BODY, STACK_FRAME, W3C_SIGNATURE,
};
use std::collections::HashSet;

/// Critical lines further apart than this never merge on pattern alone.
const CRITICAL_MERGE_DISTANCE: usize = 5;
/// How far back to look for the 404 body naming an element.
const ELEMENT_ID_LOOKBACK: usize = 10;

/// A run of lines that display as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Merged lines, in their original relative order
    pub members: Vec<LogLine>,
    /// Normalized form of the anchor line
    pub pattern: String,
    /// Request body lines swallowed along with a merged request; they
    /// duplicate the anchor's own body and are not displayed
    pub absorbed: Vec<LogLine>,
}

impl Group {
    /// A group of one line.
    pub fn single(line: LogLine) -> Self {
        let pattern = clean_log_line(&line.raw);
        Self {
            members: vec![line],
            pattern,
            absorbed: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Per-line facts computed once per grouping run.
struct Profile {
    pattern: String,
    tokens: HashSet<String>,
    critical: bool,
    request_with_body: bool,
    element_id: Option<String>,
}

impl Profile {
    fn build(lines: &[LogLine], index: usize) -> Self {
        let pattern = clean_log_line(&lines[index].raw);
        let tokens = pattern
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let critical = is_critical(lines, index);
        let request_with_body = patterns::is_match(&ANY_HTTP_REQUEST, &lines[index].raw)
            && lines
                .get(index + 1)
                .is_some_and(|next| patterns::is_match(&BODY_FIELD, &next.raw));
        let element_id = if critical {
            element_id(&lines[index].raw).or_else(|| element_id_in_context(lines, index))
        } else {
            None
        };

        Self {
            pattern,
            tokens,
            critical,
            request_with_body,
            element_id,
        }
    }

    fn similarity(&self, other: &Profile) -> f64 {
        let shared = self.tokens.intersection(&other.tokens).count();
        let union = self.tokens.len() + other.tokens.len() - shared;
        if union == 0 {
            0.0
        } else {
            shared as f64 / union as f64
        }
    }
}

/// How a candidate line relates to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    No,
    Line,
    /// Merge the line and swallow the body line that follows it
    WithBody,
}

/// A line that must not be folded into look-alikes carelessly.
pub fn is_critical(lines: &[LogLine], index: usize) -> bool {
    let raw = lines[index].raw.as_str();

    if patterns::is_match(&BASIC_ERROR, raw) {
        return true;
    }
    if patterns::is_match(&ANY_HTTP_REQUEST, raw)
        && (patterns::is_match(&IDENTIFYING_FIELD, raw)
            || lines
                .get(index + 1)
                .is_some_and(|next| patterns::is_match(&IDENTIFYING_FIELD, &next.raw)))
    {
        return true;
    }

    patterns::is_match(&ANY_HTTP_FAILURE, raw)
        || patterns::is_match(&STACK_FRAME, raw)
        || patterns::is_match(&JSON_IDENTIFIER, raw)
        || patterns::is_match(&W3C_SIGNATURE, raw)
}

/// Element id named by `value 'x'` / `unable to find ... value 'x'`.
pub fn element_id(raw: &str) -> Option<String> {
    let caps = patterns::captures(&ELEMENT_ID, raw)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Nearest element id carried by a 404 body in the lines before `index`.
fn element_id_in_context(lines: &[LogLine], index: usize) -> Option<String> {
    let start = index.saturating_sub(ELEMENT_ID_LOOKBACK);
    lines[start..index]
        .iter()
        .rev()
        .filter(|line| patterns::is_match(&NOT_FOUND_BODY, &line.raw))
        .find_map(|line| element_id(&line.raw))
}

/// Groups retained lines by identity and similarity.
pub struct SimilarityGrouper {
    config: FilterConfig,
    threshold: f64,
}

impl SimilarityGrouper {
    pub fn new(config: FilterConfig, threshold: f64) -> Self {
        Self { config, threshold }
    }

    /// Group `lines`, preserving their order. Groups appear in anchor order.
    pub fn group(&self, lines: Vec<LogLine>) -> Vec<Group> {
        if !self.config.http_grouping {
            return lines.into_iter().map(Group::single).collect();
        }

        let profiles: Vec<Profile> = (0..lines.len())
            .map(|index| Profile::build(&lines, index))
            .collect();
        let mut consumed = vec![false; lines.len()];
        let mut groups = Vec::new();

        for anchor in 0..lines.len() {
            if consumed[anchor] {
                continue;
            }
            consumed[anchor] = true;
            let mut members = vec![lines[anchor].clone()];
            let mut absorbed = Vec::new();

            for candidate in anchor + 1..lines.len() {
                if consumed[candidate] {
                    continue;
                }
                match self.compare(&profiles, anchor, candidate) {
                    Merge::No => {}
                    Merge::Line => {
                        consumed[candidate] = true;
                        members.push(lines[candidate].clone());
                    }
                    Merge::WithBody => {
                        consumed[candidate] = true;
                        members.push(lines[candidate].clone());
                        let body = candidate + 1;
                        if body < lines.len() && !consumed[body] {
                            consumed[body] = true;
                            absorbed.push(lines[body].clone());
                        }
                    }
                }
            }

            groups.push(Group {
                members,
                pattern: profiles[anchor].pattern.clone(),
                absorbed,
            });
        }

        tracing::debug!(lines = lines.len(), groups = groups.len(), "grouped lines");
        groups
    }

    fn compare(&self, profiles: &[Profile], i: usize, j: usize) -> Merge {
        let (a, b) = (&profiles[i], &profiles[j]);

        match (a.critical, b.critical) {
            (true, true) => {
                if a.request_with_body && b.request_with_body {
                    let same = a.pattern == b.pattern
                        && profiles.get(i + 1).map(|p| &p.pattern)
                            == profiles.get(j + 1).map(|p| &p.pattern);
                    return if same { Merge::WithBody } else { Merge::No };
                }

                if a.element_id.is_some() || b.element_id.is_some() {
                    let same = a.element_id == b.element_id && a.pattern == b.pattern;
                    return if same { Merge::Line } else { Merge::No };
                }

                if a.pattern == b.pattern && j - i <= CRITICAL_MERGE_DISTANCE {
                    Merge::Line
                } else {
                    Merge::No
                }
            }
            (false, false) => {
                if a.pattern == b.pattern || a.similarity(b) >= self.threshold {
                    Merge::Line
                } else {
                    Merge::No
                }
            }
            _ => Merge::No,
        }
    }
}

impl Default for SimilarityGrouper {
    fn default() -> Self {
        Self::new(FilterConfig::default(), DEFAULT_SIMILARITY_THRESHOLD)
    }
}
