use std::io::IsTerminal;

use clap::ValueEnum;
use clnrpc_client::Outcome;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use crate::exit::{CliError, CliResult, FAILURE, INTERNAL};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Print a call outcome. `field` selects one member of a successful result;
/// daemon errors are always printed whole.
pub fn print_outcome(outcome: &Outcome, field: Option<&str>, format: OutputFormat) -> CliResult<()> {
    let value = select(outcome, field)?;
    println!("{}", render(&value, format)?);
    Ok(())
}

pub fn select(outcome: &Outcome, field: Option<&str>) -> CliResult<Value> {
    match (outcome, field) {
        (Outcome::Success(result), Some(field)) => result.get(field).cloned().ok_or_else(|| {
            CliError::new(FAILURE, format!("result has no field `{field}`"))
        }),
        _ => Ok(outcome.to_value()),
    }
}

pub fn render(value: &Value, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => to_json(value, false)?,
        OutputFormat::Pretty => to_json(value, true)?,
        OutputFormat::Raw => scalar(value)?,
        OutputFormat::Table => match value {
            Value::Object(map) => {
                let mut table = new_table(vec!["FIELD", "VALUE"]);
                for (key, value) in map {
                    table.add_row(vec![key.clone(), scalar(value)?]);
                }
                table.to_string()
            }
            Value::Array(items) => {
                let mut table = new_table(vec!["#", "VALUE"]);
                for (index, item) in items.iter().enumerate() {
                    table.add_row(vec![index.to_string(), scalar(item)?]);
                }
                table.to_string()
            }
            other => scalar(other)?,
        },
    };
    Ok(rendered)
}

/// Serialize for stdout. Failure is a bug in the caller, not bad input.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(|err| CliError::new(INTERNAL, format!("failed to encode output: {err}")))
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

// Strings print unquoted; everything else as compact JSON.
fn scalar(value: &Value) -> CliResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => to_json(other, false),
    }
}
