//! `sapcli gcts commit`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::repository::Repository;

use super::{with_heartbeat, Context};

/// Commit a transport request
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Repository name
    pub package: String,

    /// Transport request number
    pub corrnr: String,

    /// Commit message; defaults to "Transport <CORRNR>"
    #[arg(short, long)]
    pub message: Option<String>,

    /// Long commit description
    #[arg(long)]
    pub description: Option<String>,

    /// Print a progress spinner every N seconds while waiting
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    pub heartbeat: u64,
}

/// Execute the `gcts commit` command.
pub fn execute(args: CommitArgs, ctx: &Context) -> Result<()> {
    let message = args
        .message
        .clone()
        .unwrap_or_else(|| format!("Transport {}", args.corrnr));

    let mut repo = Repository::new(ctx.conn, &args.package);
    with_heartbeat(args.heartbeat, || {
        repo.commit_transport(&args.corrnr, &message, args.description.as_deref())
    })
    .map_err(|err| ctx.report(err))?;

    println!("The transport \"{}\" has been committed", args.corrnr);
    Ok(())
}
