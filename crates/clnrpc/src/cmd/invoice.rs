use clnrpc_client::InvoiceOptions;
use serde_json::{Map, Value};

use crate::cmd::{parse_object, Context, InvoiceArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_outcome;

pub fn run(args: InvoiceArgs, ctx: &Context) -> CliResult<i32> {
    let filter = args
        .filter
        .as_deref()
        .map(|input| parse_object("--filter", input))
        .transpose()?;
    let amount = amount_value(&args.amount_msat);

    let mut client = ctx.client()?;
    let outcome = match filter {
        Some(filter) => {
            let mut call_args = Map::new();
            call_args.insert("amount_msat".to_string(), amount);
            call_args.insert("label".to_string(), Value::from(args.label));
            call_args.insert("description".to_string(), Value::from(args.description));
            call_args.insert("expiry".to_string(), Value::from(args.expiry));
            call_args.insert("preimage".to_string(), Value::from(args.preimage));
            client.call_filtered("invoice", call_args, filter)
        }
        None => {
            let options = InvoiceOptions {
                expiry: args.expiry,
                preimage: args.preimage,
                ..InvoiceOptions::default()
            };
            client.invoice(amount, &args.label, &args.description, &options)
        }
    }
    .map_err(|err| client_error("invoice failed", err))?;

    print_outcome(&outcome, args.field.as_deref(), ctx.format)?;
    Ok(SUCCESS)
}

// lightningd takes a number, "any", or a string with a unit suffix.
fn amount_value(input: &str) -> Value {
    input
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(input))
}
