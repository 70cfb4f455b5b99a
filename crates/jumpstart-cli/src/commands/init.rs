//! `jumpstart init`: create a project from a template.

use serde_json::{Value, json};
use tracing::instrument;

use jumpstart_core::{
    application::{InitOutcome, InitRequest, VcsStatus},
    domain::PlannedAction,
};

use crate::{
    cli::{InitArgs, OutputFormat},
    commands::build_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.template))]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    validate(&args)?;
    let service = build_service(&config, &output)?;
    let request = InitRequest {
        git: args.wants_git(),
        force: args.force,
        dry_run: args.dry_run,
        ..InitRequest::new(&args.template, &args.destination)
    };

    output.header(&format!(
        "Scaffolding '{}' into {}",
        args.template,
        args.destination.display()
    ))?;

    let outcome = service.init(request)?;

    if output.format() == OutputFormat::Json {
        return output.json(&outcome_json(&outcome));
    }
    if outcome.dry_run {
        render_plan(&outcome, &output)
    } else {
        render_summary(&outcome, &output)
    }
}

fn validate(args: &InitArgs) -> CliResult<()> {
    if args.template.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: "TEMPLATE must not be empty".into(),
        });
    }
    if args.destination.as_os_str().is_empty() {
        return Err(CliError::InvalidInput {
            message: "DESTINATION must not be empty".into(),
        });
    }
    Ok(())
}

fn render_plan(outcome: &InitOutcome, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: {} step(s) from {} would run in {}",
        outcome.plan.len(),
        outcome.plan.templates.join(" -> "),
        outcome.destination.display()
    ))?;
    for step in outcome.plan.iter() {
        output.print(&format!("  [{} #{}] {}", step.template, step.index, step.action))?;
    }
    Ok(())
}

fn render_summary(outcome: &InitOutcome, output: &OutputManager) -> CliResult<()> {
    if let Some(report) = &outcome.substitution {
        if !report.leftovers.is_empty() {
            output.warning(&format!(
                "{} placeholder(s) were left unsubstituted",
                report.leftovers.len()
            ))?;
            for leftover in &report.leftovers {
                output.print(&format!("    {leftover}"))?;
            }
        }
    }
    if let VcsStatus::Failed { reason } = &outcome.vcs {
        output.warning(&format!("git init failed: {reason}"))?;
    }

    output.success(&format!(
        "Created {} from '{}' ({} step(s))",
        outcome.destination.display(),
        outcome.template,
        outcome.executed.len()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", outcome.destination.display()))?;
    Ok(())
}

fn outcome_json(outcome: &InitOutcome) -> Value {
    let steps: Vec<Value> = outcome
        .plan
        .iter()
        .map(|step| {
            let detail = match &step.action {
                PlannedAction::Copy {
                    source,
                    destination,
                } => json!({ "from": source, "to": destination }),
                PlannedAction::Run {
                    script,
                    working_directory,
                } => json!({ "script": script, "cwd": working_directory }),
            };
            json!({
                "template": step.template,
                "index": step.index,
                "kind": step.action.kind(),
                "detail": detail,
            })
        })
        .collect();

    let variables: serde_json::Map<String, Value> = outcome
        .bindings
        .iter()
        .map(|b| (b.variable.name().to_string(), json!(b.value)))
        .collect();

    let substitution = outcome.substitution.as_ref().map(|report| {
        json!({
            "files_scanned": report.files_scanned,
            "files_rewritten": report.files_rewritten,
            "skipped_files": report.skipped_files,
            "leftovers": report.leftovers.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })
    });

    let vcs = match &outcome.vcs {
        VcsStatus::Skipped => json!("skipped"),
        VcsStatus::Initialized => json!("initialized"),
        VcsStatus::Failed { reason } => json!({ "failed": reason }),
    };

    json!({
        "run_id": outcome.run_id.to_string(),
        "template": outcome.template,
        "destination": outcome.destination,
        "dry_run": outcome.dry_run,
        "templates": outcome.plan.templates,
        "steps": steps,
        "executed": outcome.executed.len(),
        "variables": variables,
        "substitution": substitution,
        "vcs": vcs,
    })
}
