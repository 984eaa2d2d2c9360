//! Shell completion generation

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;

/// Print shell completions for the requested shell to stdout.
pub fn handle_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "fleetwatch", &mut std::io::stdout());
}
