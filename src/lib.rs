//! logsift: reduce Appium session logs to the lines that explain a failure.
//!
//! The filtering engine lives in [`filter`] and is pure: give it the log
//! text and a [`FilterConfig`], get back the digest or
//! [`FilterOutcome::NothingMeaningful`]. The remaining modules are the
//! command-line surfaces around it.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod filter;

pub use config::Config;
pub use filter::{filter_log, FilterConfig, FilterOutcome, FilterReport, FilterStats, LogFilter};
