//! Shell completion scripts

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use logsift::cli::Cli;

/// Write the completion script for `shell` to stdout.
pub fn handle(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut io::stdout());
}
