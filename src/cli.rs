//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use sapcli::config::{http_timeout, ConnectionConfig};
use sapcli::defaults::DEFAULT_PORT;
use sapcli::output::OutputConfig;

use crate::commands;

/// sapcli - drive gCTS repositories of an SAP system from the command line
#[derive(Parser, Debug)]
#[command(name = "sapcli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

/// How to reach the SAP system
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Application server host
    #[arg(long, global = true, value_name = "HOST", env = "SAP_ASHOST")]
    pub ashost: Option<String>,

    /// HTTP(S) port of the application server
    #[arg(long, global = true, value_name = "PORT", env = "SAP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SAP client (mandant)
    #[arg(long, global = true, value_name = "CLIENT", env = "SAP_CLIENT")]
    pub client: Option<String>,

    /// Logon user
    #[arg(long, global = true, value_name = "USER", env = "SAP_USER")]
    pub user: Option<String>,

    /// Logon password
    #[arg(long, global = true, value_name = "PASSWORD", env = "SAP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use HTTPS (yes/no)
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        env = "SAP_SSL",
        default_value = "yes",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub ssl: bool,

    /// Verify the server certificate (yes/no)
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        env = "SAP_SSL_VERIFY",
        default_value = "yes",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub verify: bool,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<ConnectionConfig> {
        Ok(ConnectionConfig {
            host: self.ashost.clone().unwrap_or_default(),
            port: self.port,
            client: self.client.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            ssl: self.ssl,
            verify_ssl: self.verify,
            timeout: http_timeout()?,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage gCTS repositories
    Gcts(commands::gcts::GctsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // a second initialisation (e.g. in tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Gcts(args) => commands::gcts::execute(args, &self.connection, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
