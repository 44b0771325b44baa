//! Meaningfulness classification.
//!
//! Each line is run through an ordered table of rules. The first rule whose
//! predicate matches decides the verdict; a line no rule claims is dropped.
//! Keeping the precedence in one table makes it auditable and lets each rule
//! be tested on its own.

use super::config::FilterConfig;
use super::errors::{has_error_signal, ErrorIndex, Proximity};
use super::line::LogLine;
use super::patterns::{
    self, any_match, CAPABILITY_MENTION, CAPABILITY_STATE, CRITICAL_SOURCES, DEBUG_TAG,
    DRIVER_DISCOVERY, ERROR_SIGNAL, HTTP_FAILURE_RESPONSE, HTTP_LARGE_RESPONSE, HTTP_REQUEST,
    HTTP_SESSION_RESPONSE, INTERNAL_ERROR, LIFECYCLE, NATIVE_LOOKUP, NOISE, NON_DEBUG_SESSION,
    REQUEST_BODY, ROUTINE_SUCCESS, SESSION_CHANGE, SESSION_VERB, STACK_FRAME, WARNING, WDA_MENTION,
    WDA_REUSE, WDA_STATE,
};
use super::Transform;

/// Lines shorter than this carry nothing worth keeping.
const MIN_LINE_LENGTH: usize = 10;

/// Outcome of a rule that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// Everything a rule may look at for one line.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub line: &'a LogLine,
    /// The line immediately before this one in the same sequence
    pub previous: Option<&'a LogLine>,
    pub proximity: Proximity,
    pub config: &'a FilterConfig,
}

impl RuleInput<'_> {
    fn raw(&self) -> &str {
        &self.line.raw
    }
}

/// One entry of the classification table.
pub struct Rule {
    pub name: &'static str,
    pub verdict: Verdict,
    pub applies: fn(&RuleInput<'_>) -> bool,
}

/// The classification table, in precedence order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "malformed",
        verdict: Verdict::Drop,
        applies: |input| {
            input.raw().trim().is_empty()
                || input.line.char_len() < MIN_LINE_LENGTH
                || !input.line.is_structured()
        },
    },
    Rule {
        name: "routine-success",
        verdict: Verdict::Drop,
        applies: |input| {
            input.config.context_aware_filtering
                && !input.proximity.near_error
                && patterns::is_match(&DEBUG_TAG, input.raw())
                && any_match(&ROUTINE_SUCCESS, input.raw())
                && !has_error_signal(input.raw())
        },
    },
    Rule {
        name: "http-failure",
        verdict: Verdict::Keep,
        applies: |input| {
            input.line.is_http() && patterns::is_match(&HTTP_FAILURE_RESPONSE, input.raw())
        },
    },
    Rule {
        name: "error-keyword",
        verdict: Verdict::Keep,
        applies: |input| patterns::is_match(&ERROR_SIGNAL, input.raw()),
    },
    Rule {
        name: "known-noise",
        verdict: Verdict::Drop,
        applies: |input| any_match(&NOISE, input.raw()),
    },
    Rule {
        name: "critical-source",
        verdict: Verdict::Keep,
        applies: |input| {
            input
                .line
                .source()
                .is_some_and(|source| CRITICAL_SOURCES.iter().any(|cs| source.contains(cs)))
        },
    },
    Rule {
        name: "http-traffic",
        verdict: Verdict::Keep,
        applies: |input| input.line.is_http() && is_notable_http(input.raw()),
    },
    Rule {
        name: "request-body",
        verdict: Verdict::Keep,
        applies: |input| {
            patterns::is_match(&REQUEST_BODY, input.raw())
                && input
                    .previous
                    .is_some_and(|prev| patterns::is_match(&HTTP_REQUEST, &prev.raw))
        },
    },
    Rule {
        name: "warning",
        verdict: Verdict::Keep,
        applies: |input| patterns::is_match(&WARNING, input.raw()),
    },
    Rule {
        name: "lifecycle",
        verdict: Verdict::Keep,
        applies: |input| any_match(&LIFECYCLE, input.raw()),
    },
    Rule {
        name: "non-debug-notice",
        verdict: Verdict::Keep,
        applies: |input| !input.line.is_debug() && is_non_debug_notice(input.raw()),
    },
    Rule {
        name: "debug-diagnostic",
        verdict: Verdict::Keep,
        applies: |input| {
            input.line.is_debug()
                && (patterns::is_match(&INTERNAL_ERROR, input.raw())
                    || patterns::is_match(&NATIVE_LOOKUP, input.raw())
                    || patterns::is_match(&STACK_FRAME, input.raw()))
        },
    },
];

/// Outbound requests always; inbound 200s only for session changes or
/// large bodies; failures always.
fn is_notable_http(raw: &str) -> bool {
    if patterns::is_match(&HTTP_REQUEST, raw) {
        return true;
    }
    if patterns::is_match(&HTTP_SESSION_RESPONSE, raw)
        && (patterns::is_match(&SESSION_VERB, raw) || patterns::is_match(&SESSION_CHANGE, raw))
    {
        return true;
    }
    patterns::is_match(&HTTP_LARGE_RESPONSE, raw) || patterns::is_match(&HTTP_FAILURE_RESPONSE, raw)
}

fn is_non_debug_notice(raw: &str) -> bool {
    patterns::is_match(&NON_DEBUG_SESSION, raw)
        || patterns::is_match(&DRIVER_DISCOVERY, raw)
        || (patterns::is_match(&WDA_MENTION, raw)
            && (patterns::is_match(&WDA_STATE, raw) || patterns::is_match(&WDA_REUSE, raw)))
        || (patterns::is_match(&CAPABILITY_MENTION, raw)
            && patterns::is_match(&CAPABILITY_STATE, raw))
}

/// Evaluate the table for one line: the first matching rule wins.
///
/// Returns the verdict together with the deciding rule's name, or `None`
/// when no rule matched (the line is then dropped).
pub fn evaluate(input: &RuleInput<'_>) -> Option<(Verdict, &'static str)> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .map(|rule| (rule.verdict, rule.name))
}

/// Decide whether a single line is worth keeping.
pub fn is_meaningful(input: &RuleInput<'_>) -> bool {
    matches!(evaluate(input), Some((Verdict::Keep, _)))
}

/// Retains only meaningful lines, judging each against its neighbours in
/// the full sequence.
pub struct Classifier<'a> {
    config: FilterConfig,
    errors: &'a ErrorIndex,
    dropped: usize,
}

impl<'a> Classifier<'a> {
    /// `errors` must be the index of the sequence this classifier will see.
    pub fn new(config: FilterConfig, errors: &'a ErrorIndex) -> Self {
        Self {
            config,
            errors,
            dropped: 0,
        }
    }

    /// Number of lines dropped by the last transform.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }
}

impl Transform for Classifier<'_> {
    fn transform(&mut self, lines: &mut Vec<LogLine>) {
        let keep: Vec<bool> = lines
            .iter()
            .enumerate()
            .map(|(position, line)| {
                let input = RuleInput {
                    line,
                    previous: position.checked_sub(1).map(|p| &lines[p]),
                    proximity: self.errors.proximity(line.index),
                    config: &self.config,
                };
                let verdict = evaluate(&input);
                if let Some((verdict, rule)) = verdict {
                    tracing::trace!(index = line.index, rule, ?verdict, "classified line");
                }
                matches!(verdict, Some((Verdict::Keep, _)))
            })
            .collect();

        let before = lines.len();
        let mut flags = keep.into_iter();
        lines.retain(|_| flags.next().unwrap_or(false));
        self.dropped = before - lines.len();
    }
}
