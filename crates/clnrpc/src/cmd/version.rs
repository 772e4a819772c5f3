use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("clnrpc {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: clnrpc");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("CLNRPC_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("CLNRPC_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("max_path_len: {}", clnrpc_transport::MAX_PATH_LEN);
    println!("default_id_prefix: {}", clnrpc_client::DEFAULT_ID_PREFIX);
    println!(
        "builtin_methods: {}",
        clnrpc_schema::builtin::METHODS.len()
    );

    Ok(SUCCESS)
}
