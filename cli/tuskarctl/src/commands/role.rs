//! Role commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output;

use super::CommandContext;

/// Role commands.
#[derive(Debug, Args)]
pub struct RoleCommand {
    #[command(subcommand)]
    command: RoleSubcommand,
}

#[derive(Debug, Subcommand)]
enum RoleSubcommand {
    /// List the roles available for plans.
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
}

impl RoleCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            RoleSubcommand::List => list_roles(ctx).await,
        }
    }
}

async fn list_roles(ctx: CommandContext) -> Result<()> {
    let roles = ctx.client.roles.list().await?;
    let rows: Vec<RoleRow> = roles
        .iter()
        .map(|role| RoleRow {
            uuid: role.uuid.clone(),
            name: role.name.clone(),
            version: role.version.map(|v| v.to_string()).unwrap_or_default(),
        })
        .collect();
    output::print_list(&rows, ctx.format);
    Ok(())
}
