use clnrpc_client::Params;

use crate::cmd::{parse_json, CallArgs, Context};
use crate::exit::{client_error, CliError, CliResult, SUCCESS};
use crate::output::print_outcome;

pub fn run(args: CallArgs, ctx: &Context) -> CliResult<i32> {
    let positional = args
        .positional
        .as_deref()
        .map(|input| parse_json("--positional", input))
        .transpose()?;
    let keyword = args
        .params
        .as_deref()
        .map(|input| parse_json("--params", input))
        .transpose()?;
    let filter = args
        .filter
        .as_deref()
        .map(|input| parse_json("--filter", input))
        .transpose()?;
    let params = Params::from_parts(positional, keyword, filter)
        .map_err(|err| CliError::usage(err.to_string()))?;

    let mut client = ctx.client()?;
    let outcome = client
        .call_raw(&args.method, params)
        .map_err(|err| client_error(&format!("{} failed", args.method), err))?;

    print_outcome(&outcome, args.field.as_deref(), ctx.format)?;
    Ok(SUCCESS)
}
