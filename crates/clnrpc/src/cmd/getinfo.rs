use crate::cmd::{parse_object, Context, GetinfoArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_outcome;

pub fn run(args: GetinfoArgs, ctx: &Context) -> CliResult<i32> {
    let filter = args
        .filter
        .as_deref()
        .map(|input| parse_object("--filter", input))
        .transpose()?;

    let mut client = ctx.client()?;
    let outcome = match filter {
        Some(filter) => client.getinfo_filtered(filter),
        None => client.getinfo(),
    }
    .map_err(|err| client_error("getinfo failed", err))?;

    print_outcome(&outcome, args.field.as_deref(), ctx.format)?;
    Ok(SUCCESS)
}
