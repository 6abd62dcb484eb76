//! `sapcli gcts pull`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::simple;

use super::{with_heartbeat, Context};

/// git pull
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Repository name
    pub package: String,

    /// Print a progress spinner every N seconds while waiting
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    pub heartbeat: u64,
}

/// Execute the `gcts pull` command.
pub fn execute(args: PullArgs, ctx: &Context) -> Result<()> {
    let transition = with_heartbeat(args.heartbeat, || {
        simple::pull(ctx.conn, args.package.as_str().into())
    })
    .map_err(|err| ctx.report(err))?;

    println!("The repository \"{}\" has been pulled", args.package);
    println!(
        "{} -> {}",
        transition.from_commit.unwrap_or_default(),
        transition.to_commit.unwrap_or_default()
    );

    Ok(())
}
