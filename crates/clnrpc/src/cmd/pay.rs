use clnrpc_client::PayOptions;

use crate::cmd::{Context, PayArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_outcome;

pub fn run(args: PayArgs, ctx: &Context) -> CliResult<i32> {
    let options = PayOptions {
        amount_msat: args.amount_msat,
        label: args.label,
        ..PayOptions::default()
    };

    let mut client = ctx.client()?;
    let outcome = client
        .pay(&args.bolt11, &options)
        .map_err(|err| client_error("pay failed", err))?;

    print_outcome(&outcome, args.field.as_deref(), ctx.format)?;
    Ok(SUCCESS)
}
