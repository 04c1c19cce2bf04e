//! CLI commands.

mod overcloud;
mod plan;
mod role;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{GlobalArgs, Settings};
use crate::error::command_error;
use crate::output::OutputFormat;

/// Tuskar CLI - manage deployment plans and overclouds.
#[derive(Debug, Parser)]
#[command(name = "tuskar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage deployment plans.
    Plan(plan::PlanCommand),

    /// Inspect the roles available for plans.
    Role(role::RoleCommand),

    /// Manage overclouds.
    Overcloud(overcloud::OvercloudCommand),

    /// Show the client version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let settings = Settings::from_args(self.global);
        init_logging(settings.debug);

        let format = match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        match self.command {
            Commands::Version => {
                println!("tuskar {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            Commands::Plan(cmd) => {
                cmd.run(CommandContext::connect(&settings, format).await?).await
            }
            Commands::Role(cmd) => {
                cmd.run(CommandContext::connect(&settings, format).await?).await
            }
            Commands::Overcloud(cmd) => {
                cmd.run(CommandContext::connect(&settings, format).await?).await
            }
        }
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Shared command context: a connected API client and the output format.
pub struct CommandContext {
    pub client: tuskar_api::Client,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Validate auth options, resolve a session and build the client.
    ///
    /// Token mode connects without any network traffic; password mode
    /// performs the identity handshake here, once.
    pub async fn connect(settings: &Settings, format: OutputFormat) -> Result<Self> {
        settings.ensure_auth_info()?;

        if settings.api_version != tuskar_api::SUPPORTED_API_VERSION {
            return Err(command_error(format!(
                "Unsupported API version '{}'. Only version {} is supported.",
                settings.api_version,
                tuskar_api::SUPPORTED_API_VERSION
            )));
        }

        let mut resolver = tuskar_api::AuthResolver::new(settings.credentials.clone())?;
        let session = resolver.resolve(None, None).await?;
        let client = tuskar_api::Client::new(&session)?;

        Ok(Self { client, format })
    }
}
