//! `sapcli gcts config`

use anyhow::{bail, Result};
use clap::Args;

use sapcli::gcts::repository::Repository;

use super::Context;

/// git config [-l] <package>
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// List the configuration of the repository
    #[arg(short, long)]
    pub list: bool,

    /// Repository name
    pub package: String,
}

/// Only listing is supported.
pub fn validate(args: &ConfigArgs) -> Result<()> {
    if !args.list {
        bail!("Invalid command line options\nRun: sapcli gcts config --help");
    }
    Ok(())
}

/// Execute the `gcts config` command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    validate(&args)?;

    let mut repo = Repository::new(ctx.conn, &args.package);
    let config = repo.configuration().map_err(|err| ctx.report(err))?;

    for (key, value) in &config {
        println!("{}={}", key, value);
    }

    Ok(())
}
