use clnrpc_schema::{MethodRegistry, MethodSpec};
use serde::Serialize;

use crate::cmd::{Context, MethodsArgs};
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{new_table, to_json, OutputFormat};

#[derive(Serialize)]
struct MethodOutput<'a> {
    name: &'a str,
    required: &'a [String],
    optional: &'a [String],
    filterable: bool,
    schema: bool,
}

pub fn run(args: MethodsArgs, ctx: &Context) -> CliResult<i32> {
    let mut registry = MethodRegistry::builtin();
    if let Some(dir) = &args.schemas {
        registry.load_directory(dir).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("failed loading schemas from {}: {err}", dir.display()),
            )
        })?;
    }

    let specs = registry.specs();
    let rows: Vec<MethodOutput<'_>> = specs
        .iter()
        .map(|spec| row(spec, registry.has_schema(&spec.name)))
        .collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&rows, false)?),
        OutputFormat::Pretty => println!("{}", to_json(&rows, true)?),
        OutputFormat::Table => {
            let mut table = new_table(vec!["METHOD", "REQUIRED", "OPTIONAL", "FILTER"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.required.join(", "),
                    row.optional.join(", "),
                    if row.filterable { "yes" } else { "no" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }

    Ok(SUCCESS)
}

fn row(spec: &MethodSpec, schema: bool) -> MethodOutput<'_> {
    MethodOutput {
        name: &spec.name,
        required: &spec.required,
        optional: &spec.optional,
        filterable: spec.filterable,
        schema,
    }
}
