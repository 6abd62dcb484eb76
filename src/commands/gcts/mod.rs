//! # gCTS Command Group
//!
//! `sapcli gcts <command>` maps git-like commands onto the gCTS REST service.
//! Commands share the connection built from the global options, the error
//! report that dumps gCTS message logs to stderr, and the optional heartbeat
//! spinner shown while a long request blocks.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use sapcli::connection::HttpConnection;
use sapcli::error::Error;
use sapcli::gcts::messages::MessageDump;
use sapcli::output::OutputConfig;
use sapcli::suggestions;

use crate::cli::ConnectionArgs;

pub mod checkout;
pub mod clone;
pub mod commit;
pub mod config;
pub mod delete;
pub mod history;
pub mod pull;
pub mod repo;
pub mod repolist;
pub mod user;

/// Manage gCTS repositories
#[derive(Args, Debug)]
pub struct GctsArgs {
    #[command(subcommand)]
    command: GctsCommand,
}

#[derive(Subcommand, Debug)]
enum GctsCommand {
    /// List repositories
    Repolist(repolist::RepolistArgs),

    /// git clone <repository> [<package>]
    Clone(clone::CloneArgs),

    /// git config [-l] <package>
    Config(config::ConfigArgs),

    /// Delete a repository
    Delete(delete::DeleteArgs),

    /// git checkout <branch>
    Checkout(checkout::CheckoutArgs),

    /// git log
    Log(history::LogArgs),

    /// git pull
    Pull(pull::PullArgs),

    /// Commit a transport request
    Commit(commit::CommitArgs),

    /// User settings
    User(user::UserArgs),

    /// Repository settings
    Repo(repo::RepoArgs),
}

/// Execute the `gcts` command group.
pub fn execute(args: GctsArgs, connection: &ConnectionArgs, output: &OutputConfig) -> Result<()> {
    // usage errors need no connection
    if let GctsCommand::Config(config_args) = &args.command {
        config::validate(config_args)?;
    }

    let config = connection.to_config()?;
    let conn = HttpConnection::new(&config).map_err(suggestions::with_hints)?;
    let ctx = Context {
        conn: &conn,
        output,
    };

    match args.command {
        GctsCommand::Repolist(args) => repolist::execute(args, &ctx),
        GctsCommand::Clone(args) => clone::execute(args, &ctx),
        GctsCommand::Config(args) => config::execute(args, &ctx),
        GctsCommand::Delete(args) => delete::execute(args, &ctx),
        GctsCommand::Checkout(args) => checkout::execute(args, &ctx),
        GctsCommand::Log(args) => history::execute(args, &ctx),
        GctsCommand::Pull(args) => pull::execute(args, &ctx),
        GctsCommand::Commit(args) => commit::execute(args, &ctx),
        GctsCommand::User(args) => user::execute(args, &ctx),
        GctsCommand::Repo(args) => repo::execute(args, &ctx),
    }
}

/// What every gCTS command gets to work with
pub struct Context<'a> {
    pub conn: &'a HttpConnection,
    pub output: &'a OutputConfig,
}

impl Context<'_> {
    /// Prints the gCTS message log of a failure to stderr.
    ///
    /// The returned error only carries the one-line summary.
    pub fn report(&self, error: Error) -> anyhow::Error {
        match &error {
            Error::Gcts(gcts) => {
                for line in dump_lines(&MessageDump::from_messages(gcts.messages()), self.output) {
                    eprintln!("{}", line);
                }
                anyhow::anyhow!("{}", gcts)
            }
            _ => suggestions::with_hints(error),
        }
    }
}

/// Section headings are styled, message lines are not.
pub fn dump_lines(dump: &MessageDump, output: &OutputConfig) -> Vec<String> {
    dump.lines()
        .into_iter()
        .map(|line| match line.as_str() {
            "Error Log:" | "Log:" | "Exception:" => output.heading(&line),
            _ => line,
        })
        .collect()
}

/// Runs `operation` with a spinner ticking every `seconds` on stderr.
///
/// Zero disables the spinner.
pub fn with_heartbeat<T>(seconds: u64, operation: impl FnOnce() -> T) -> T {
    if seconds == 0 {
        return operation();
    }

    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Waiting for the system");
    spinner.enable_steady_tick(Duration::from_secs(seconds));

    let result = operation();
    spinner.finish_and_clear();
    result
}
