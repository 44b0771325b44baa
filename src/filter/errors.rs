//! Error signal detection and error-proximity context.

use super::line::LogLine;
use super::patterns::{self, ERROR_SIGNAL, HTTP_FAILURE_RESPONSE};
use std::collections::BTreeSet;

/// Lines within this many positions of an error count as near it.
pub const PROXIMITY_WINDOW: usize = 5;

/// True when a line carries an error or failure signal: a failure keyword,
/// a `status 4xx/5xx` phrase, or an inbound HTTP 4xx/5xx response.
pub fn has_error_signal(raw: &str) -> bool {
    patterns::is_match(&ERROR_SIGNAL, raw) || patterns::is_match(&HTTP_FAILURE_RESPONSE, raw)
}

/// Positions of every line carrying an error signal, computed once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorIndex {
    positions: BTreeSet<usize>,
}

impl ErrorIndex {
    /// Scan a line sequence once.
    pub fn scan(lines: &[LogLine]) -> Self {
        let positions = lines
            .iter()
            .filter(|line| has_error_signal(&line.raw))
            .map(|line| line.index)
            .collect();
        Self { positions }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Proximity of the line at `index` to the nearest indexed error.
    pub fn proximity(&self, index: usize) -> Proximity {
        let low = index.saturating_sub(PROXIMITY_WINDOW);
        let high = index.saturating_add(PROXIMITY_WINDOW);
        Proximity {
            near_error: self.positions.range(low..=high).next().is_some(),
        }
    }
}

/// Whether a line sits within [`PROXIMITY_WINDOW`] lines of an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Proximity {
    pub near_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::line::split_lines;

    fn sample() -> Vec<LogLine> {
        let mut raw: Vec<String> = (0..20)
            .map(|i| format!("2024-01-15 10:23:45:{i:03} - [debug] [Proxy] routine {i}"))
            .collect();
        raw[10] = "2024-01-15 10:23:45:010 - [debug] [Proxy] NoSuchElementError thrown".to_string();
        split_lines(&raw.join("\n"))
    }

    #[test]
    fn indexes_error_lines() {
        let index = ErrorIndex::scan(&sample());

        assert_eq!(index.len(), 1);
        assert!(index.contains(10));
        assert!(!index.contains(9));
    }

    #[test]
    fn proximity_window_is_inclusive() {
        let index = ErrorIndex::scan(&sample());

        assert!(index.proximity(5).near_error);
        assert!(index.proximity(15).near_error);
        assert!(!index.proximity(4).near_error);
        assert!(!index.proximity(16).near_error);
    }

    #[test]
    fn http_failure_responses_are_errors() {
        assert!(has_error_signal(
            "2024-01-15 10:23:46:567 - [HTTP] [HTTP] <-- POST /element 404 89ms"
        ));
        assert!(!has_error_signal(
            "2024-01-15 10:23:46:567 - [HTTP] [HTTP] <-- POST /element 200 89ms"
        ));
    }

    #[test]
    fn empty_index_is_never_near() {
        let index = ErrorIndex::default();
        assert!(index.is_empty());
        assert!(!index.proximity(0).near_error);
    }
}
