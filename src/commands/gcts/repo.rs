//! `sapcli gcts repo`

use anyhow::Result;
use clap::{Args, Subcommand};

use sapcli::gcts::repository::Repository;

use super::Context;

/// Repository settings
#[derive(Args, Debug)]
pub struct RepoArgs {
    #[command(subcommand)]
    command: RepoCommand,
}

#[derive(Subcommand, Debug)]
enum RepoCommand {
    /// Change the remote URL of a repository
    SetUrl {
        /// Repository name
        package: String,

        /// New remote URL
        url: String,
    },
}

/// Execute the `gcts repo` command.
pub fn execute(args: RepoArgs, ctx: &Context) -> Result<()> {
    match args.command {
        RepoCommand::SetUrl { package, url } => {
            let mut repo = Repository::new(ctx.conn, &package);
            match repo.set_url(&url).map_err(|err| ctx.report(err))? {
                Some(response) => println!("{}", response.text()),
                None => println!("The repository \"{}\" already uses the URL \"{}\"", package, url),
            }
        }
    }
    Ok(())
}
