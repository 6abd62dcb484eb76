//! # Completions Command Implementation
//!
//! Generates shell completion scripts with `clap_complete`, covering every
//! `sapcli` command including the `gcts` group.
//!
//! ```bash
//! sapcli completions bash > ~/.local/share/bash-completion/completions/sapcli
//! sapcli completions zsh > ~/.zfunc/_sapcli
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Writes the completion script for the requested shell to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
