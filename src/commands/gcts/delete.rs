//! `sapcli gcts delete`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::simple;

use super::Context;

/// Delete a repository
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Repository name
    pub package: String,
}

/// Execute the `gcts delete` command.
pub fn execute(args: DeleteArgs, ctx: &Context) -> Result<()> {
    simple::delete(ctx.conn, &args.package).map_err(|err| ctx.report(err))?;
    println!("The repository \"{}\" has been deleted", args.package);
    Ok(())
}
