//! `sapcli gcts user`

use anyhow::Result;
use clap::{Args, Subcommand};

use sapcli::gcts::simple;

use super::Context;

/// User settings
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Store an API token for a remote Git host
    SetCredentials {
        /// API endpoint of the Git host
        #[arg(short, long)]
        api_url: String,

        /// API token
        #[arg(short, long)]
        token: String,
    },
}

/// Execute the `gcts user` command.
pub fn execute(args: UserArgs, ctx: &Context) -> Result<()> {
    match args.command {
        UserCommand::SetCredentials { api_url, token } => {
            simple::set_user_api_token(ctx.conn, &api_url, &token)
                .map_err(|err| ctx.report(err))?;
        }
    }
    Ok(())
}
