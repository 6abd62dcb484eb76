//! `sapcli gcts checkout`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::repository::Repository;
use sapcli::gcts::simple;

use super::{with_heartbeat, Context};

/// git checkout <branch>
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Repository name
    pub package: String,

    /// Branch to switch to
    pub branch: String,

    /// Print a progress spinner every N seconds while waiting
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    pub heartbeat: u64,
}

/// Execute the `gcts checkout` command.
pub fn execute(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut repo = Repository::new(ctx.conn, &args.package);
    let old_branch = repo
        .branch()
        .map_err(|err| ctx.report(err))?
        .unwrap_or_default();

    let transition = with_heartbeat(args.heartbeat, || {
        simple::checkout(ctx.conn, &args.branch, (&mut repo).into())
    })
    .map_err(|err| ctx.report(err))?;

    println!(
        "The repository \"{}\" has been set to the branch \"{}\"",
        args.package, args.branch
    );
    println!(
        "({}:{}) -> ({}:{})",
        old_branch,
        transition.from_commit.unwrap_or_default(),
        args.branch,
        transition.to_commit.unwrap_or_default()
    );

    Ok(())
}
