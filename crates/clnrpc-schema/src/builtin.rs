//! Hand-maintained table of the lightningd RPC methods the client knows.
//!
//! The daemon can describe itself (`help`, schema documents), but those
//! descriptions are fetched through this same client, so the starting
//! registry is static.

/// Static description of one daemon method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinMethod {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub filterable: bool,
}

const fn method(
    name: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    filterable: bool,
) -> BuiltinMethod {
    BuiltinMethod {
        name,
        required,
        optional,
        filterable,
    }
}

/// Built-in method surface. `getinfo` first: no parameters at all.
pub const METHODS: &[BuiltinMethod] = &[
    method("getinfo", &[], &[], true),
    method("help", &[], &["command"], true),
    method("stop", &[], &[], false),
    method("notifications", &["enable"], &[], false),
    method(
        "invoice",
        &["amount_msat", "label", "description"],
        &[
            "expiry",
            "fallbacks",
            "preimage",
            "exposeprivatechannels",
            "cltv",
            "deschashonly",
        ],
        true,
    ),
    method(
        "listinvoices",
        &[],
        &["label", "invstring", "payment_hash", "offer_id", "index", "start", "limit"],
        true,
    ),
    method("delinvoice", &["label", "status"], &["desconly"], true),
    method("waitinvoice", &["label"], &[], true),
    method("waitanyinvoice", &[], &["lastpay_index", "timeout"], true),
    method(
        "pay",
        &["bolt11"],
        &[
            "amount_msat",
            "label",
            "riskfactor",
            "maxfeepercent",
            "retry_for",
            "maxdelay",
            "exemptfee",
            "localinvreqid",
            "exclude",
            "maxfee",
            "description",
        ],
        true,
    ),
    method("listpays", &[], &["bolt11", "payment_hash", "status"], true),
    method("listsendpays", &[], &["bolt11", "payment_hash", "status"], true),
    method("decodepay", &["bolt11"], &["description"], true),
    method("decode", &["string"], &[], true),
    method(
        "keysend",
        &["destination", "amount_msat"],
        &[
            "label",
            "maxfeepercent",
            "retry_for",
            "maxdelay",
            "exemptfee",
            "routehints",
            "extratlvs",
        ],
        true,
    ),
    method(
        "sendpay",
        &["route", "payment_hash"],
        &[
            "label",
            "amount_msat",
            "bolt11",
            "payment_secret",
            "partid",
            "localinvreqid",
            "groupid",
        ],
        true,
    ),
    method("waitsendpay", &["payment_hash"], &["timeout", "partid", "groupid"], true),
    method(
        "getroute",
        &["id", "amount_msat", "riskfactor"],
        &["cltv", "fromid", "fuzzpercent", "exclude", "maxhops"],
        true,
    ),
    method("connect", &["id"], &["host", "port"], true),
    method("disconnect", &["id"], &["force"], false),
    method("ping", &["id"], &["len", "pongbytes"], true),
    method("listpeers", &[], &["id", "level"], true),
    method("listpeerchannels", &[], &["id"], true),
    method(
        "listchannels",
        &[],
        &["short_channel_id", "source", "destination"],
        true,
    ),
    method("listnodes", &[], &["id"], true),
    method("listfunds", &[], &["spent"], true),
    method(
        "listforwards",
        &[],
        &["status", "in_channel", "out_channel", "index", "start", "limit"],
        true,
    ),
    method("listconfigs", &[], &["config"], true),
    method("newaddr", &[], &["addresstype"], true),
    method(
        "withdraw",
        &["destination", "satoshi"],
        &["feerate", "minconf", "utxos"],
        true,
    ),
    method(
        "fundchannel",
        &["id", "amount"],
        &[
            "feerate",
            "announce",
            "minconf",
            "push_msat",
            "close_to",
            "request_amt",
            "compact_lease",
            "utxos",
            "mindepth",
            "reserve",
        ],
        true,
    ),
    method(
        "close",
        &["id"],
        &[
            "unilateraltimeout",
            "destination",
            "fee_negotiation_step",
            "wrong_funding",
            "force_lease_closed",
            "feerange",
        ],
        true,
    ),
    method("feerates", &["style"], &[], true),
    method("signmessage", &["message"], &[], true),
    method("checkmessage", &["message", "zbase"], &["pubkey"], true),
    method("waitblockheight", &["blockheight"], &["timeout"], true),
    method("check", &["command_to_check"], &[], false),
];

/// Look up a built-in method by name.
pub fn find(name: &str) -> Option<&'static BuiltinMethod> {
    METHODS.iter().find(|method| method.name == name)
}
