//! Convenience bindings over [`Client::call`] for common methods.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::{to_args, Client};
use crate::error::Result;
use crate::params::Params;
use crate::response::Outcome;

/// Optional `invoice` arguments. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallbacks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preimage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposeprivatechannels: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cltv: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deschashonly: Option<bool>,
}

/// Optional `pay` arguments. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_msat: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub riskfactor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxfeepercent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_for: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxdelay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exemptfee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxfee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Client {
    /// The node's status report.
    pub fn getinfo(&mut self) -> Result<Outcome> {
        self.call("getinfo", Map::new())
    }

    /// `getinfo` projected through `filter`, e.g. `{"id": true}`.
    pub fn getinfo_filtered(&mut self, filter: Map<String, Value>) -> Result<Outcome> {
        self.call_filtered("getinfo", Map::new(), filter)
    }

    /// Create an invoice. `amount_msat` is a number or `"any"`.
    pub fn invoice(
        &mut self,
        amount_msat: impl Into<Value>,
        label: &str,
        description: &str,
        options: &InvoiceOptions,
    ) -> Result<Outcome> {
        let mut args = to_args(options)?;
        args.insert("amount_msat".to_string(), amount_msat.into());
        args.insert("label".to_string(), Value::from(label));
        args.insert("description".to_string(), Value::from(description));
        self.call("invoice", args)
    }

    /// Pay a bolt11 invoice.
    pub fn pay(&mut self, bolt11: &str, options: &PayOptions) -> Result<Outcome> {
        let mut args = to_args(options)?;
        args.insert("bolt11".to_string(), Value::from(bolt11));
        self.call("pay", args)
    }

    /// List invoices, optionally only the one with `label`.
    pub fn listinvoices(&mut self, label: Option<&str>) -> Result<Outcome> {
        let mut args = Map::new();
        if let Some(label) = label {
            args.insert("label".to_string(), Value::from(label));
        }
        self.call("listinvoices", args)
    }

    /// The daemon's own command list, or help for one command.
    pub fn help(&mut self, command: Option<&str>) -> Result<Outcome> {
        let params = match command {
            Some(command) => {
                let mut args = Map::new();
                args.insert("command".to_string(), Value::from(command));
                Params::Keyword(args)
            }
            None => Params::None,
        };
        self.call_raw("help", params)
    }
}
