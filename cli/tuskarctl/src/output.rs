//! Output formatting for CLI commands.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};
use tuskar_api::models::{Plan, PlanParameter, Role};

/// Notice shown in place of plan parameters unless `--long` is given.
pub const PARAMETERS_SUPPRESSED: &str =
    "Parameter output suppressed. Use --long to display them.";

/// Output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// One row of a two-column property table.
#[derive(Debug, Tabled)]
pub struct PropertyRow {
    #[tabled(rename = "Property")]
    pub property: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl PropertyRow {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Print a single resource as a Property/Value table, rows sorted by
/// property name.
pub fn print_properties(mut rows: Vec<PropertyRow>) {
    rows.sort_by(|a, b| a.property.cmp(&b.property));
    println!("{}", Table::new(rows));
}

/// Print a list of objects in the requested format.
pub fn print_list<T: Tabled + Serialize>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => println!("{}", format_json(rows, "[]")),
    }
}

/// Print a single resource as pretty JSON.
pub fn print_json<T: Serialize>(data: &T) {
    println!("{}", format_json(data, "{}"));
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| fallback.to_string())
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Format a key/value map with one `k=v` pair per line, sorted by key.
pub fn attributes_formatter<'a, I>(attributes: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut pairs: Vec<_> = attributes
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    pairs.sort();
    pairs.join("\n")
}

/// Format plan roles as a comma-joined list of names.
pub fn roles_formatter(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|role| role.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format plan parameters with one `name=value` pair per line.
pub fn parameters_formatter(parameters: &[PlanParameter]) -> String {
    parameters
        .iter()
        .map(|parameter| format!("{}={}", parameter.name, value_display(&parameter.value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn value_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Print plan details. Without `long`, parameters are replaced with a
/// suppression notice.
pub fn print_plan(plan: &Plan, long: bool, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(plan);
        return;
    }

    let parameters = if long {
        parameters_formatter(&plan.parameters)
    } else {
        PARAMETERS_SUPPRESSED.to_string()
    };

    print_properties(vec![
        PropertyRow::new("uuid", &plan.uuid),
        PropertyRow::new("name", &plan.name),
        PropertyRow::new("description", plan.description.as_deref().unwrap_or("")),
        PropertyRow::new("roles", roles_formatter(&plan.roles)),
        PropertyRow::new("parameters", parameters),
    ]);
}
