//! End-to-end filtering of fixture logs through the library API.

use logsift::filter::{clean_log_line, DEFAULT_SIMILARITY_THRESHOLD};
use logsift::{filter_log, FilterConfig, FilterOutcome, LogFilter};

use crate::helpers::load_fixture;

fn filter_session(config: FilterConfig) -> String {
    filter_log(
        &load_fixture("session.log"),
        &config,
        DEFAULT_SIMILARITY_THRESHOLD,
    )
    .expect("session fixture has meaningful lines")
}

// ============================================================================
// Session Fixture Tests
// ============================================================================

#[test]
fn session_keeps_failure_evidence() {
    let output = filter_session(FilterConfig::default());

    assert!(output.contains("--> POST /session/5f1c2d3e/element"));
    assert!(output.contains(r#"{"using":"accessibility id","value":"loginButton"}"#));
    assert!(output.contains("Matched W3C error code 'no such element' to NoSuchElementError"));
    assert!(output.contains("<-- POST /session/5f1c2d3e/element 404 520 ms - 423"));
}

#[test]
fn session_drops_noise() {
    let output = filter_session(FilterConfig::default());

    assert!(!output.contains("Executing command"));
    assert!(!output.contains("Waiting up to 0 ms"));
    assert!(!output.contains("Responding to client"));
    assert!(!output.contains("Checking BaseDriver versions"));
    assert!(!output.contains("Welcome to Appium"));
}

#[test]
fn session_setup_is_summarized() {
    let output = filter_session(FilterConfig::default());

    assert!(output.contains("2024-01-15 10:23:42:000 - [SUMMARY] 1 capability warning(s): fullReset"));
    assert!(output.contains("Using WDA path"));
    assert!(!output.contains("Booting simulator"));
    assert!(!output.contains("Installing application under test"));
}

#[test]
fn session_polling_is_grouped() {
    let output = filter_session(FilterConfig::default());

    assert!(output.contains(
        "2024-01-15 10:23:45:000 → 10:23:45:700 [debug] [REPEATED 8x] TIMESTAMP - [debug] [XCUITestDriver@OBJ] Polling simulator state"
    ));
    assert_eq!(output.matches("Polling simulator state").count(), 1);
}

#[test]
fn session_without_grouping_lists_every_poll() {
    let config = FilterConfig {
        http_grouping: false,
        ..FilterConfig::default()
    };

    let output = filter_session(config);

    assert_eq!(output.matches("Polling simulator state").count(), 8);
    assert!(!output.contains("REPEATED"));
}

#[test]
fn session_without_compression_keeps_setup_chatter() {
    let config = FilterConfig {
        session_compression: false,
        ..FilterConfig::default()
    };

    let output = filter_session(config);

    assert!(!output.contains("[SUMMARY]"));
    assert!(output.contains("Booting simulator"));
    assert!(output.contains("Capability 'fullReset' changed from false to true"));
}

#[test]
fn output_lines_keep_input_order() {
    let output = filter_session(FilterConfig::default());

    let position = |needle: &str| output.find(needle).unwrap();
    assert!(position("Attempting to find matching driver") < position("Session created"));
    assert!(position("Session created") < position("NoSuchElementError"));
    assert!(position("NoSuchElementError") < position("REPEATED 8x"));
    assert!(position("REPEATED 8x") < position("--> DELETE"));
}

#[test]
fn output_has_no_trailing_whitespace() {
    let output = filter_session(FilterConfig::default());
    assert_eq!(output, output.trim_end());
}

// ============================================================================
// Outcome and Stats Tests
// ============================================================================

#[test]
fn routine_fixture_is_nothing_meaningful() {
    let report = LogFilter::default().run(&load_fixture("routine.log"));
    assert_eq!(report.outcome, FilterOutcome::NothingMeaningful);
}

#[test]
fn stats_match_output() {
    let content = load_fixture("session.log");

    let report = LogFilter::default().run(&content);

    let text = report.outcome.text().unwrap();
    assert_eq!(report.stats.original_lines, content.split('\n').count());
    assert_eq!(report.stats.filtered_lines, text.lines().count());
    assert_eq!(report.stats.error_lines, 3);
    assert!(report.stats.reduction_percent > 50.0);
    assert_eq!(report.stats.session_lines_removed, 4);
}

#[test]
fn runs_are_deterministic_across_configs() {
    let content = load_fixture("session.log");
    let configs = [
        FilterConfig::default(),
        FilterConfig::minimal(),
        FilterConfig {
            context_aware_filtering: false,
            ..FilterConfig::default()
        },
    ];

    for config in configs {
        let first = filter_log(&content, &config, 0.85);
        let second = filter_log(&content, &config, 0.85);
        assert_eq!(first, second, "config {config:?}");
    }
}

#[test]
fn normalization_is_idempotent_over_fixture() {
    for line in load_fixture("session.log").lines() {
        let once = clean_log_line(line);
        assert_eq!(clean_log_line(&once), once, "line {line:?}");
    }
}
