//! Implementation of the `jumpstart list` command.

use serde_json::json;

use jumpstart_core::application::TemplateSummary;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config, &output)?;
    let templates = service.list_templates()?;

    // --output-format json wins over --format
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if templates.is_empty() {
                output.warning(&format!(
                    "No templates found under {}",
                    service.resolver().templates_directory()?.display()
                ))?;
                return Ok(());
            }
            output.header("Available Templates:")?;
            for template in &templates {
                output.print(&table_row(template))?;
            }
        }
        ListFormat::Json => {
            let rows: Vec<_> = templates
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "path": t.path,
                        "extends": t.extends,
                        "steps": t.steps,
                        "legacy": t.legacy,
                        "invalid": t.invalid,
                    })
                })
                .collect();
            output.json(&rows)?;
        }
        ListFormat::List => {
            for t in &templates {
                output.raw(&t.name)?;
            }
        }
        ListFormat::Csv => {
            output.raw("name,extends,steps,legacy,valid")?;
            for t in &templates {
                output.raw(&format!(
                    "{},{},{},{},{}",
                    t.name,
                    t.extends.join(" "),
                    t.steps,
                    t.legacy,
                    t.invalid.is_none()
                ))?;
            }
        }
    }

    Ok(())
}

fn table_row(template: &TemplateSummary) -> String {
    if let Some(reason) = &template.invalid {
        return format!("  {:<20} invalid: {reason}", template.name);
    }
    let mut row = format!("  {:<20} {} step(s)", template.name, template.steps);
    if !template.extends.is_empty() {
        row.push_str(&format!(", extends {}", template.extends.join(", ")));
    }
    if template.legacy {
        row.push_str(" (files/ only)");
    }
    row
}
