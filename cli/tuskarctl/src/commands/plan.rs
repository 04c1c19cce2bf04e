//! Plan commands.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tuskar_api::marshal;
use tuskar_api::models::{Plan, Ref};

use crate::error::command_error;
use crate::output::{self, PropertyRow};

use super::CommandContext;

/// Plan commands.
#[derive(Debug, Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    command: PlanSubcommand,
}

#[derive(Debug, Subcommand)]
enum PlanSubcommand {
    /// Create a deployment plan.
    Create(CreatePlanArgs),

    /// Delete a deployment plan.
    Delete(PlanUuidArgs),

    /// List the deployment plans.
    List,

    /// Update a plan's parameters, flavors and scale counts.
    Set(SetPlanArgs),

    /// Show a deployment plan.
    Show(ShowPlanArgs),

    /// Add a role to a plan.
    AddRole(PlanRoleArgs),

    /// Remove a role from a plan.
    RemoveRole(PlanRoleArgs),

    /// Download a plan's template files into a directory.
    Download(DownloadPlanArgs),
}

#[derive(Debug, Args)]
struct CreatePlanArgs {
    /// Name of the plan being created.
    name: String,

    /// A textual description of the plan.
    #[arg(short = 'd', long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct PlanUuidArgs {
    /// The UUID of the plan.
    plan_uuid: String,
}

#[derive(Debug, Args)]
struct SetPlanArgs {
    /// The UUID of the plan being updated.
    plan_uuid: String,

    /// Set a parameter in the plan. Can be specified multiple times.
    #[arg(short = 'P', long = "parameter", value_name = "KEY1=VALUE1")]
    parameters: Vec<String>,

    /// Set the flavor for a role in the plan. Can be specified multiple
    /// times.
    #[arg(short = 'F', long = "flavor", value_name = "ROLE=FLAVOR")]
    flavors: Vec<String>,

    /// Set the scale count for a role in the plan. Can be specified multiple
    /// times.
    #[arg(short = 'S', long = "scale", value_name = "ROLE=SCALE-COUNT")]
    scales: Vec<String>,
}

#[derive(Debug, Args)]
struct ShowPlanArgs {
    /// The UUID of the plan to show.
    plan_uuid: String,

    /// Display full plan details, including parameters.
    #[arg(long)]
    long: bool,
}

#[derive(Debug, Args)]
struct PlanRoleArgs {
    /// The UUID of the plan.
    plan_uuid: String,

    /// The UUID of the role.
    role_uuid: String,
}

#[derive(Debug, Args)]
struct DownloadPlanArgs {
    /// The UUID of the plan to download.
    plan_uuid: String,

    /// Directory to write template files into. It will be created if it does
    /// not exist and any existing contents will be removed.
    #[arg(short = 'O', long = "output-dir", value_name = "OUTPUT DIR")]
    output_dir: PathBuf,
}

impl PlanCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            PlanSubcommand::Create(args) => create_plan(ctx, args).await,
            PlanSubcommand::Delete(args) => delete_plan(ctx, args).await,
            PlanSubcommand::List => list_plans(ctx).await,
            PlanSubcommand::Set(args) => set_plan(ctx, args).await,
            PlanSubcommand::Show(args) => show_plan(ctx, args).await,
            PlanSubcommand::AddRole(args) => add_role(ctx, args).await,
            PlanSubcommand::RemoveRole(args) => remove_role(ctx, args).await,
            PlanSubcommand::Download(args) => download_plan(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Roles")]
    roles: String,
}

/// Create a plan and print its details.
async fn create_plan(ctx: CommandContext, args: CreatePlanArgs) -> Result<()> {
    let plan = match ctx
        .client
        .plans
        .create(&args.name, args.description.as_deref())
        .await
    {
        Err(tuskar_api::Error::Conflict(_)) => {
            return Err(command_error(format!(
                "Plan with name \"{}\" already exists.",
                args.name
            )));
        }
        other => other?,
    }
    .ok_or_else(|| anyhow::anyhow!("service returned no plan body"))?;

    output::print_plan(&plan, true, ctx.format);
    Ok(())
}

async fn delete_plan(ctx: CommandContext, args: PlanUuidArgs) -> Result<()> {
    ctx.client.plans.delete(&args.plan_uuid).await?;
    output::print_success(&format!("Deleted plan {}.", args.plan_uuid));
    Ok(())
}

async fn list_plans(ctx: CommandContext) -> Result<()> {
    let plans = ctx.client.plans.list().await?;
    let rows: Vec<PlanRow> = plans
        .iter()
        .map(|plan| PlanRow {
            uuid: plan.uuid.clone(),
            name: plan.name.clone(),
            description: plan.description.clone().unwrap_or_default(),
            roles: output::roles_formatter(&plan.roles),
        })
        .collect();
    output::print_list(&rows, ctx.format);
    Ok(())
}

/// Update plan parameters, flavors and scale counts via a patch request.
async fn set_plan(ctx: CommandContext, args: SetPlanArgs) -> Result<()> {
    let plan = require_plan(&ctx, &args.plan_uuid).await?;

    let mut patch = Vec::new();
    patch.extend(marshal::parameters_to_patch(&args.parameters).map_err(into_command_error)?);
    patch.extend(
        marshal::role_args_to_patch(&args.flavors, &plan.roles, "flavor")
            .map_err(into_command_error)?,
    );
    patch.extend(
        marshal::role_args_to_patch(&args.scales, &plan.roles, "count")
            .map_err(into_command_error)?,
    );

    let plan = if patch.is_empty() {
        eprintln!(
            "WARNING: No valid arguments passed. No update operation has been performed."
        );
        plan
    } else {
        ctx.client
            .plans
            .patch(&args.plan_uuid, &patch)
            .await?
            .unwrap_or(plan)
    };

    output::print_plan(&plan, true, ctx.format);
    Ok(())
}

async fn show_plan(ctx: CommandContext, args: ShowPlanArgs) -> Result<()> {
    let plan = require_plan(&ctx, &args.plan_uuid).await?;
    output::print_plan(&plan, args.long, ctx.format);
    Ok(())
}

async fn add_role(ctx: CommandContext, args: PlanRoleArgs) -> Result<()> {
    let plan = ctx
        .client
        .plans
        .add_role(Ref::Id(&args.plan_uuid), &args.role_uuid)
        .await?
        .ok_or_else(|| anyhow::anyhow!("service returned no plan body"))?;
    print_plan_role_counts(&plan, ctx.format);
    Ok(())
}

async fn remove_role(ctx: CommandContext, args: PlanRoleArgs) -> Result<()> {
    let plan = ctx
        .client
        .plans
        .remove_role(Ref::Id(&args.plan_uuid), &args.role_uuid)
        .await?
        .ok_or_else(|| anyhow::anyhow!("service returned no plan body"))?;
    print_plan_role_counts(&plan, ctx.format);
    Ok(())
}

/// Download the plan's templates, replacing the output directory.
async fn download_plan(ctx: CommandContext, args: DownloadPlanArgs) -> Result<()> {
    let templates = ctx.client.plans.templates(&args.plan_uuid).await?;

    let output_dir = &args.output_dir;
    if output_dir.is_dir() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    println!("The following templates will be written:");
    for (template_name, template_content) in &templates {
        let filename = output_dir.join(template_name);
        // Template names may carry directory components.
        if let Some(parent) = filename.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&filename, template_content)?;
        println!("{}", filename.display());
    }

    Ok(())
}

async fn require_plan(ctx: &CommandContext, uuid: &str) -> Result<Plan> {
    ctx.client
        .plans
        .get(uuid)
        .await?
        .ok_or_else(|| command_error(format!("Plan not found: {uuid}")))
}

fn into_command_error(err: tuskar_api::Error) -> anyhow::Error {
    match err {
        user_facing @ (tuskar_api::Error::RoleNotFound(_)
        | tuskar_api::Error::MalformedPair(_)
        | tuskar_api::Error::InvalidCount { .. }) => command_error(user_facing.to_string()),
        other => other.into(),
    }
}

/// Print a plan after a role membership change: parameters are reduced to
/// the per-role count entries.
fn print_plan_role_counts(plan: &Plan, format: output::OutputFormat) {
    if let output::OutputFormat::Json = format {
        output::print_json(plan);
        return;
    }

    let counts: Vec<_> = plan
        .parameters
        .iter()
        .filter(|parameter| parameter.name.ends_with("::count"))
        .cloned()
        .collect();

    output::print_properties(vec![
        PropertyRow::new("uuid", &plan.uuid),
        PropertyRow::new("name", &plan.name),
        PropertyRow::new("description", plan.description.as_deref().unwrap_or("")),
        PropertyRow::new("roles", output::roles_formatter(&plan.roles)),
        PropertyRow::new("parameters", output::parameters_formatter(&counts)),
    ]);
}
