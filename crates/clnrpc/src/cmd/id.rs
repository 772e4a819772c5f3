use clnrpc_client::Params;

use crate::cmd::{Context, IdArgs};
use crate::exit::{client_error, CliResult, SUCCESS};

pub fn run(args: IdArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.client()?;
    let response = client
        .request(&args.method, Params::None)
        .map_err(|err| client_error("call failed", err))?;

    // A null id only comes back with an error outcome.
    match response.id {
        Some(id) => println!("{id}"),
        None => println!("null"),
    }
    Ok(SUCCESS)
}
