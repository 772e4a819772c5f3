use crate::cmd::{Context, ListinvoicesArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_outcome;

pub fn run(args: ListinvoicesArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.client()?;
    let outcome = client
        .listinvoices(args.label.as_deref())
        .map_err(|err| client_error("listinvoices failed", err))?;

    print_outcome(&outcome, args.field.as_deref(), ctx.format)?;
    Ok(SUCCESS)
}
