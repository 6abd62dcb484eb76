//! `sapcli gcts repolist`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::repository::Repository;
use sapcli::gcts::simple;
use sapcli::output::TableWriter;

use super::Context;

const HEADERS: [&str; 6] = ["Name", "Branch", "Commit", "Status", "vSID", "URL"];

/// List repositories
#[derive(Args, Debug)]
pub struct RepolistArgs {}

/// Execute the `gcts repolist` command.
pub fn execute(_args: RepolistArgs, ctx: &Context) -> Result<()> {
    let repos = simple::list_all(ctx.conn).map_err(|err| ctx.report(err))?;

    let mut table = TableWriter::new(&HEADERS);
    for mut repo in repos {
        table.add_row(row(&mut repo).map_err(|err| ctx.report(err))?);
    }

    for line in table.lines(" | ") {
        println!("{}", line.trim_end());
    }

    Ok(())
}

fn row(repo: &mut Repository<'_>) -> sapcli::error::Result<Vec<String>> {
    Ok(vec![
        repo.name().to_string(),
        repo.branch()?.unwrap_or_default(),
        repo.head()?.unwrap_or_default(),
        repo.status()?.unwrap_or_default(),
        repo.vsid()?.unwrap_or_default(),
        repo.url()?.unwrap_or_default(),
    ])
}
