use std::io;

use clap::CommandFactory;
use clap_complete::{generate, shells::Shell};

/// Writes the `appstore` completion script for `shell` to stdout.
pub fn generate_completion(shell: Shell) {
    let mut command = crate::Cli::command();
    generate(shell, &mut command, "appstore", &mut io::stdout());
}
