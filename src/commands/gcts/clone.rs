//! `sapcli gcts clone`

use anyhow::Result;
use clap::Args;

use sapcli::defaults::{DEFAULT_STARTING_FOLDER, DEFAULT_VSID};
use sapcli::gcts::repository::{package_name_from_url, RepoType, Role};
use sapcli::gcts::simple::{self, CloneOptions};

use super::{with_heartbeat, Context};

/// git clone <repository> [<package>]
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// URL of the remote Git repository
    pub url: String,

    /// Repository name; defaults to the last URL segment without `.git`
    pub package: Option<String>,

    /// Virtual system ID of the repository
    #[arg(long, default_value = DEFAULT_VSID)]
    pub vsid: String,

    /// Folder of the ABAP sources in the Git repository
    #[arg(long, default_value = DEFAULT_STARTING_FOLDER)]
    pub starting_folder: String,

    /// Do not fail when the repository is already registered
    #[arg(long)]
    pub no_fail_exists: bool,

    /// Access token for the remote Git host
    #[arg(long, value_name = "TOKEN")]
    pub vcs_token: Option<String>,

    /// Kind of remote repository (GITHUB, GIT)
    #[arg(short = 't', long = "type", default_value_t = RepoType::Github)]
    pub typ: RepoType,

    /// Development role (SOURCE, TARGET)
    #[arg(short, long, default_value_t = Role::Source)]
    pub role: Role,

    /// Print a progress spinner every N seconds while waiting
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    pub heartbeat: u64,
}

impl CloneArgs {
    fn package(&self) -> &str {
        match self.package.as_deref() {
            Some(package) => package,
            None => package_name_from_url(&self.url),
        }
    }

    fn options(&self) -> CloneOptions {
        CloneOptions {
            vsid: self.vsid.clone(),
            start_dir: Some(self.starting_folder.clone()),
            vcs_token: self.vcs_token.clone(),
            error_exists: !self.no_fail_exists,
            role: self.role,
            typ: self.typ,
        }
    }
}

/// Execute the `gcts clone` command.
pub fn execute(args: CloneArgs, ctx: &Context) -> Result<()> {
    let package = args.package();
    let options = args.options();

    let summary = with_heartbeat(args.heartbeat, || {
        let mut repo = simple::clone_new(ctx.conn, &args.url, package, &options)?;
        Ok::<_, sapcli::error::Error>((repo.url()?, repo.branch()?, repo.head()?))
    });
    let (url, branch, head) = summary.map_err(|err| ctx.report(err))?;

    println!("Cloned repository:");
    println!(" URL   : {}", url.unwrap_or_default());
    println!(" branch: {}", branch.unwrap_or_default());
    println!(" HEAD  : {}", head.unwrap_or_default());

    Ok(())
}
