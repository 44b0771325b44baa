//! Log line model: splitting raw text and the derived `level` / `source` tags.

use super::patterns::{self, LEVEL_TAG, SOURCE_TAG, STRUCTURED_PREFIX, TIMESTAMP};

/// Severity or channel tag following the leading ` - [`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    /// Protocol traffic (`[HTTP]`)
    Http,
    /// Debug chatter (`[debug]`)
    Debug,
    /// Any other tag, lower-cased (`info`, `warning`, `error`, ...)
    Other(String),
}

impl Level {
    fn parse(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        if tag.contains("http") {
            Level::Http
        } else if tag.contains("debug") {
            Level::Debug
        } else {
            Level::Other(tag)
        }
    }
}

/// One line of a session log.
///
/// `level`, `source` and the structural check are derived from `raw` once,
/// when the line is built, and stay fixed for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Position in the sequence the line currently belongs to
    pub index: usize,
    /// The line text exactly as it appeared in the input
    pub raw: String,
    level: Option<Level>,
    source: Option<String>,
    structured: bool,
}

impl LogLine {
    /// Build a line and derive its tags.
    pub fn new(index: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let level = patterns::captures(&LEVEL_TAG, &raw)
            .and_then(|caps| caps.get(1))
            .map(|tag| Level::parse(tag.as_str()));
        let source = patterns::captures(&SOURCE_TAG, &raw)
            .or_else(|| patterns::captures(&LEVEL_TAG, &raw))
            .and_then(|caps| caps.get(1))
            .map(|tag| tag.as_str().to_lowercase());
        let structured = patterns::is_match(&STRUCTURED_PREFIX, &raw);

        Self {
            index,
            raw,
            level,
            source,
            structured,
        }
    }

    /// Same position, different text (tags are derived again).
    pub fn with_raw(&self, raw: impl Into<String>) -> Self {
        Self::new(self.index, raw)
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Inner subsystem tag (`[debug] [XCUITest]` gives `xcuitest`), falling
    /// back to the level tag.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Matches the `YYYY-MM-DD HH:MM:SS:mmm - [` shape.
    pub fn is_structured(&self) -> bool {
        self.structured
    }

    pub fn is_http(&self) -> bool {
        matches!(self.level, Some(Level::Http))
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.level, Some(Level::Debug))
    }

    /// The leading timestamp, if the line carries one.
    pub fn timestamp(&self) -> Option<&str> {
        match &*TIMESTAMP {
            Some(re) => re.find(&self.raw).map(|m| m.as_str()),
            None => None,
        }
    }

    /// Length in characters rather than bytes.
    pub fn char_len(&self) -> usize {
        self.raw.chars().count()
    }
}

/// Split raw text into lines, accepting both `\n` and `\r\n` endings.
///
/// A trailing empty segment is kept so line positions match the input.
pub fn split_lines(content: &str) -> Vec<LogLine> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, raw)| LogLine::new(index, raw))
        .collect()
}
