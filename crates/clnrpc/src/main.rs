mod cmd;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;
use clnrpc_client::DEFAULT_ID_PREFIX;

use crate::cmd::{parse_duration, Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "clnrpc", version, about = "Core Lightning JSON-RPC client")]
struct Cli {
    /// Path of the daemon's lightning-rpc socket.
    #[arg(long, value_name = "PATH", env = "CLNRPC_SOCKET", global = true)]
    socket: Option<PathBuf>,

    /// Prefix of request ids.
    #[arg(long, value_name = "PREFIX", env = "CLNRPC_ID_PREFIX", default_value = DEFAULT_ID_PREFIX, global = true)]
    id_prefix: String,

    /// Socket read/write timeout (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long, value_name = "DURATION", global = true)]
    timeout: Option<String>,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = cli
        .timeout
        .as_deref()
        .map(parse_duration)
        .transpose()
        .and_then(|timeout| {
            let ctx = Context {
                socket: cli.socket,
                id_prefix: cli.id_prefix,
                timeout,
                format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
            };
            cmd::run(cli.command, &ctx)
        });

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
