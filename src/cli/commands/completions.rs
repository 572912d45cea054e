use std::io;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Print a completion script for `shell`.
pub fn execute(shell: Shell) {
    let mut command = Cli::command();
    generate(shell, &mut command, "lit", &mut io::stdout());
}
