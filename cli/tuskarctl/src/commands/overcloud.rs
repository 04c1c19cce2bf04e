//! Overcloud commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tuskar_api::marshal;
use tuskar_api::models::Overcloud;
use tuskar_api::overclouds::OvercloudBody;

use crate::error::command_error;
use crate::output::{self, PropertyRow};

use super::CommandContext;

/// Overcloud commands.
#[derive(Debug, Args)]
pub struct OvercloudCommand {
    #[command(subcommand)]
    command: OvercloudSubcommand,
}

#[derive(Debug, Subcommand)]
enum OvercloudSubcommand {
    /// Create an overcloud.
    Create(CreateOvercloudArgs),

    /// List the overclouds.
    List,

    /// Show an overcloud.
    Show(OvercloudIdArgs),

    /// Update an overcloud.
    Update(UpdateOvercloudArgs),

    /// Delete an overcloud.
    Delete(OvercloudIdArgs),
}

#[derive(Debug, Args)]
struct CreateOvercloudArgs {
    /// Name of the overcloud to create.
    name: String,

    /// User-readable text describing the overcloud.
    #[arg(short = 'd', long, value_name = "DESCRIPTION")]
    description: Option<String>,

    /// UID of the stack in Heat.
    #[arg(short = 's', long = "stack-id", value_name = "STACK ID")]
    stack_id: Option<String>,

    /// Can be specified multiple times, or once with pairs separated by
    /// semicolon.
    #[arg(long, value_name = "KEY1=VALUE1;KEY2=VALUE2...")]
    attributes: Vec<String>,

    /// Can be specified multiple times, or once with pairs separated by
    /// semicolon.
    #[arg(long, value_name = "ROLE NAME=COUNT;ROLE NAME=COUNT...")]
    roles: Vec<String>,
}

#[derive(Debug, Args)]
struct OvercloudIdArgs {
    /// ID or name of the overcloud.
    id: String,
}

#[derive(Debug, Args)]
struct UpdateOvercloudArgs {
    /// ID or name of the overcloud to update.
    id: String,

    /// New name for the overcloud.
    #[arg(short = 'n', long, value_name = "NAME")]
    name: Option<String>,

    /// User-readable text describing the overcloud.
    #[arg(short = 'd', long, value_name = "DESCRIPTION")]
    description: Option<String>,

    /// UID of the stack in Heat.
    #[arg(short = 's', long = "stack-id", value_name = "STACK ID")]
    stack_id: Option<String>,

    /// Can be specified multiple times, or once with pairs separated by
    /// semicolon.
    #[arg(long, value_name = "KEY1=VALUE1;KEY2=VALUE2...")]
    attributes: Vec<String>,

    /// Can be specified multiple times, or once with pairs separated by
    /// semicolon.
    #[arg(long, value_name = "ROLE NAME=COUNT;ROLE NAME=COUNT...")]
    roles: Vec<String>,
}

impl OvercloudCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            OvercloudSubcommand::Create(args) => create_overcloud(ctx, args).await,
            OvercloudSubcommand::List => list_overclouds(ctx).await,
            OvercloudSubcommand::Show(args) => show_overcloud(ctx, args).await,
            OvercloudSubcommand::Update(args) => update_overcloud(ctx, args).await,
            OvercloudSubcommand::Delete(args) => delete_overcloud(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct OvercloudRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Stack ID")]
    stack_id: String,
    #[tabled(rename = "Attributes")]
    attributes: String,
}

async fn create_overcloud(ctx: CommandContext, args: CreateOvercloudArgs) -> Result<()> {
    let body = OvercloudBody {
        name: Some(args.name),
        description: args.description,
        stack_id: args.stack_id,
        attributes: marshal::format_attributes(&args.attributes).map_err(into_command_error)?,
        counts: marshal::format_role_counts(&args.roles).map_err(into_command_error)?,
    };

    let overcloud = ctx
        .client
        .overclouds
        .create(&body)
        .await?
        .ok_or_else(|| anyhow::anyhow!("service returned no overcloud body"))?;
    print_overcloud_detail(&overcloud, ctx.format);
    Ok(())
}

async fn list_overclouds(ctx: CommandContext) -> Result<()> {
    let overclouds = ctx.client.overclouds.list().await?;
    let rows: Vec<OvercloudRow> = overclouds
        .iter()
        .map(|overcloud| OvercloudRow {
            id: overcloud.id.clone(),
            name: overcloud.name.clone(),
            description: overcloud.description.clone().unwrap_or_default(),
            stack_id: overcloud.stack_id.clone().unwrap_or_default(),
            attributes: output::attributes_formatter(&overcloud.attributes),
        })
        .collect();
    output::print_list(&rows, ctx.format);
    Ok(())
}

async fn show_overcloud(ctx: CommandContext, args: OvercloudIdArgs) -> Result<()> {
    let overcloud = find_overcloud(&ctx, &args.id).await?;
    print_overcloud_detail(&overcloud, ctx.format);
    Ok(())
}

async fn update_overcloud(ctx: CommandContext, args: UpdateOvercloudArgs) -> Result<()> {
    let overcloud = find_overcloud(&ctx, &args.id).await?;

    let body = OvercloudBody {
        name: args.name,
        description: args.description,
        stack_id: args.stack_id,
        attributes: marshal::format_attributes(&args.attributes).map_err(into_command_error)?,
        counts: marshal::format_role_counts(&args.roles).map_err(into_command_error)?,
    };

    let updated = ctx
        .client
        .overclouds
        .update(&overcloud.id, &body)
        .await?
        .unwrap_or(overcloud);
    print_overcloud_detail(&updated, ctx.format);
    Ok(())
}

async fn delete_overcloud(ctx: CommandContext, args: OvercloudIdArgs) -> Result<()> {
    let overcloud = find_overcloud(&ctx, &args.id).await?;
    ctx.client.overclouds.delete(&overcloud.id).await?;
    println!("Deleted Overcloud \"{}\".", overcloud.name);
    Ok(())
}

async fn find_overcloud(ctx: &CommandContext, ident: &str) -> Result<Overcloud> {
    match ctx.client.overclouds.find(ident).await {
        Err(tuskar_api::Error::NotFound(message)) => Err(command_error(message)),
        other => Ok(other?),
    }
}

fn into_command_error(err: tuskar_api::Error) -> anyhow::Error {
    match err {
        user_facing @ (tuskar_api::Error::MalformedPair(_)
        | tuskar_api::Error::InvalidCount { .. }) => command_error(user_facing.to_string()),
        other => other.into(),
    }
}

fn print_overcloud_detail(overcloud: &Overcloud, format: output::OutputFormat) {
    if let output::OutputFormat::Json = format {
        output::print_json(overcloud);
        return;
    }

    let counts = overcloud
        .counts
        .iter()
        .map(|count| format!("{}={}", count.overcloud_role_id, count.num_nodes))
        .collect::<Vec<_>>()
        .join("\n");

    output::print_properties(vec![
        PropertyRow::new("id", &overcloud.id),
        PropertyRow::new("name", &overcloud.name),
        PropertyRow::new(
            "description",
            overcloud.description.as_deref().unwrap_or(""),
        ),
        PropertyRow::new("stack_id", overcloud.stack_id.as_deref().unwrap_or("")),
        PropertyRow::new(
            "attributes",
            output::attributes_formatter(&overcloud.attributes),
        ),
        PropertyRow::new("counts", counts),
    ]);
}
