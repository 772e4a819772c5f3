use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use clnrpc_client::{Client, ClientConfig};
use serde_json::{Map, Value};
use tracing::info;

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod call;
pub mod getinfo;
pub mod id;
pub mod invoice;
pub mod listinvoices;
pub mod methods;
pub mod pay;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call any method with raw params.
    Call(CallArgs),
    /// Show the node's status report.
    Getinfo(GetinfoArgs),
    /// Create an invoice.
    Invoice(InvoiceArgs),
    /// Pay a bolt11 invoice.
    Pay(PayArgs),
    /// List invoices.
    Listinvoices(ListinvoicesArgs),
    /// Call a method without params and print the id the daemon echoed.
    Id(IdArgs),
    /// List the methods the client knows.
    Methods(MethodsArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub socket: Option<PathBuf>,
    pub id_prefix: String,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

impl Context {
    pub fn client(&self) -> CliResult<Client> {
        let socket = self.socket.as_ref().ok_or_else(|| {
            CliError::usage("no RPC socket given: pass --socket or set CLNRPC_SOCKET")
        })?;
        let config = ClientConfig::new(socket)
            .with_id_prefix(self.id_prefix.clone())
            .with_timeout(self.timeout);

        let mut client = Client::with_config(config);
        client.on_notification(|notification| {
            info!(method = %notification.method, params = %notification.params, "notification");
        });
        Ok(client)
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Call(args) => call::run(args, ctx),
        Command::Getinfo(args) => getinfo::run(args, ctx),
        Command::Invoice(args) => invoice::run(args, ctx),
        Command::Pay(args) => pay::run(args, ctx),
        Command::Listinvoices(args) => listinvoices::run(args, ctx),
        Command::Id(args) => id::run(args, ctx),
        Command::Methods(args) => methods::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Method name.
    pub method: String,
    /// Keyword params as a JSON object.
    #[arg(long, value_name = "JSON", conflicts_with = "positional")]
    pub params: Option<String>,
    /// Positional params as a JSON array.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["params", "filter"])]
    pub positional: Option<String>,
    /// Result filter as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub filter: Option<String>,
    /// Print only this field of the result.
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetinfoArgs {
    /// Result filter as a JSON object, e.g. '{"id":true}'.
    #[arg(long, value_name = "JSON")]
    pub filter: Option<String>,
    /// Print only this field of the result.
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// Amount in millisatoshi, or "any".
    pub amount_msat: String,
    /// Unique invoice label.
    pub label: String,
    /// Invoice description.
    pub description: String,
    /// Seconds until the invoice expires.
    #[arg(long)]
    pub expiry: Option<u64>,
    /// Payment preimage as hex.
    #[arg(long, value_name = "HEX")]
    pub preimage: Option<String>,
    /// Result filter as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub filter: Option<String>,
    /// Print only this field of the result.
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Invoice to pay.
    pub bolt11: String,
    /// Amount for invoices that do not carry one.
    #[arg(long)]
    pub amount_msat: Option<u64>,
    /// Label for the payment.
    #[arg(long)]
    pub label: Option<String>,
    /// Print only this field of the result.
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListinvoicesArgs {
    /// Only the invoice with this label.
    #[arg(long)]
    pub label: Option<String>,
    /// Print only this field of the result.
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Method name.
    #[arg(default_value = "getinfo")]
    pub method: String,
}

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Also load request schemas from this directory.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_json(flag: &str, input: &str) -> CliResult<Value> {
    serde_json::from_str(input)
        .map_err(|err| CliError::usage(format!("{flag} is not valid JSON: {err}")))
}

pub fn parse_object(flag: &str, input: &str) -> CliResult<Map<String, Value>> {
    match parse_json(flag, input)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::usage(format!("{flag} must be a JSON object"))),
    }
}

/// Parse a duration such as `5s`, `500ms` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = match input.strip_suffix("ms") {
        Some(number) => (number, true),
        None => (input.strip_suffix('s').unwrap_or(input), false),
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
