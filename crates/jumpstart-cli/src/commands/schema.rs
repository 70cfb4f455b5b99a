//! `jumpstart schema`: print the JSON Schema of `jumpstart.yaml`.

use jumpstart_adapters::json_schema;

use crate::{
    cli::SchemaArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: SchemaArgs, output: OutputManager) -> CliResult<()> {
    let schema = json_schema();
    if !args.compact {
        return output.json(&schema);
    }
    let rendered = serde_json::to_string(&schema).map_err(|source| CliError::Render {
        what: "manifest schema",
        source,
    })?;
    output.raw(&rendered)?;
    Ok(())
}
