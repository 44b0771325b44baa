//! Integration tests: the library against fixtures, and the CLI binary.

mod cli_test;
mod config_test;
mod filter_test;
mod helpers;
