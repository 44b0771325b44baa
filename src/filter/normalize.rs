//! Line normalization for equality and similarity comparison.
//!
//! Volatile substrings (timestamps, addresses, durations, hosts, ports,
//! long paths) are rewritten to stable placeholders so that two lines that
//! differ only in those details compare equal. The normalized text is only
//! ever shown to the user inside a repeated-group line.

use super::patterns::{
    FRACTIONAL_MS, HEX_ADDRESS, HTTP_URL, INTEGER_MS, LONG_PATH, OBJECT_ID, OBJECT_QUALIFIER,
    Pattern, TIMESTAMP, TRAILING_PORT, WHITESPACE_RUN,
};
use super::patterns;
use regex::Captures;
use std::borrow::Cow;

/// Paths longer than this collapse their middle segments.
const LONG_PATH_THRESHOLD: usize = 60;

/// Normalize one raw line. Deterministic and idempotent.
pub fn clean_log_line(line: &str) -> String {
    let text = replace(&TIMESTAMP, line, "TIMESTAMP");
    let text = replace(&HEX_ADDRESS, &text, "0xHEX");
    let text = replace_object_ids(&text);
    // Fractional durations first, otherwise `1.5ms` would become `1.Xms`.
    let text = replace(&FRACTIONAL_MS, &text, "X.Xms");
    let text = replace(&INTEGER_MS, &text, "Xms");
    let text = replace(&HTTP_URL, &text, "http://HOST");
    let text = replace(&TRAILING_PORT, &text, ":PORT${1}");
    let text = collapse_long_paths(&text);
    let text = replace(&WHITESPACE_RUN, &text, " ");
    text.trim().to_string()
}

fn replace(pattern: &Pattern, text: &str, with: &str) -> String {
    match &**pattern {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// `@1a2b3c` becomes `@OBJ` unless a parenthesized qualifier follows it.
fn replace_object_ids(text: &str) -> String {
    let Some(re) = &*OBJECT_ID else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if patterns::is_match(&OBJECT_QUALIFIER, &text[m.end()..]) {
            out.push_str(m.as_str());
        } else {
            out.push_str("@OBJ");
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Keep the first and last component of long slash-delimited paths.
fn collapse_long_paths(text: &str) -> String {
    let Some(re) = &*LONG_PATH else {
        return text.to_string();
    };

    let collapsed: Cow<'_, str> = re.replace_all(text, |caps: &Captures<'_>| {
        let whole = &caps[0];
        if whole.len() > LONG_PATH_THRESHOLD {
            format!("{}/...{}", &caps[1], &caps[2])
        } else {
            whole.to_string()
        }
    });
    collapsed.into_owned()
}
