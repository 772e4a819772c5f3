#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clnrpc_client::{
    Client, ClientConfig, ClientError, ErrorCategory, InvoiceOptions, Outcome, Params,
    ProtocolError,
};
use serde_json::{json, Map, Value};

type Responder = fn(&Value) -> Vec<String>;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/clnrpc-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Serves a fixed number of connections, one request each, and records
/// every request it reads.
struct MockDaemon {
    requests: Arc<Mutex<Vec<Value>>>,
    handle: thread::JoinHandle<()>,
}

impl MockDaemon {
    fn bind(path: &Path, connections: usize, respond: Responder) -> Self {
        let listener = UnixListener::bind(path).expect("mock daemon should bind");
        Self::serve(listener, connections, respond)
    }

    fn serve(listener: UnixListener, connections: usize, respond: Responder) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for _ in 0..connections {
                let (stream, _) = listener.accept().expect("mock daemon should accept");
                handle_connection(stream, respond, &recorded);
            }
        });
        Self { requests, handle }
    }

    fn finish(self) -> Vec<Value> {
        self.handle.join().expect("mock daemon thread should complete");
        let mut requests = self.requests.lock().expect("request log lock");
        std::mem::take(&mut *requests)
    }
}

fn handle_connection(stream: UnixStream, respond: Responder, requests: &Mutex<Vec<Value>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("stream should clone"));
    let mut line = String::new();
    reader.read_line(&mut line).expect("request should be readable");
    assert!(line.ends_with('\n'), "request should be newline terminated");
    let request: Value = serde_json::from_str(&line).expect("request should be JSON");
    requests.lock().expect("request log lock").push(request.clone());

    let mut stream = stream;
    for message in respond(&request) {
        stream
            .write_all(message.as_bytes())
            .expect("response should be writable");
    }
}

fn node_info() -> Value {
    json!({
        "id": "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc",
        "alias": "SILENTARTIST",
        "color": "02a163",
        "num_peers": 0,
        "num_pending_channels": 0,
        "num_active_channels": 0,
        "num_inactive_channels": 0,
        "address": [],
        "binding": [{"type": "ipv4", "address": "127.0.0.1", "port": 7171}],
        "version": "v24.08",
        "blockheight": 101,
        "network": "regtest",
        "fees_collected_msat": 0,
        "lightning-dir": "/tmp/l1/regtest"
    })
}

// lightningd pads every response with a blank line.
fn line(message: Value) -> String {
    format!("{message}\n\n")
}

fn project(result: Value, filter: Option<&Value>) -> Value {
    let (Some(Value::Object(filter)), Value::Object(result)) = (filter, &result) else {
        return result;
    };
    let projected: Map<String, Value> = result
        .iter()
        .filter(|(key, _)| filter.get(key.as_str()) == Some(&Value::Bool(true)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(projected)
}

fn invoice(params: &Value) -> Result<Value, Value> {
    for (index, name) in ["amount_msat", "label", "description"].iter().enumerate() {
        let present = match params {
            Value::Array(values) => values.get(index).is_some(),
            Value::Object(map) => map.contains_key(*name),
            _ => false,
        };
        if !present {
            return Err(json!({
                "code": -32602,
                "message": format!("missing required parameter: {name}")
            }));
        }
    }
    Ok(json!({
        "payment_hash": "5c3b0e6cdbd9a1d7c9e4e0c0a4a0e5a0bd7a3b3a9a8c1f1b2b5d3c2a1f0e9d8c",
        "expires_at": 1_700_604_800u64,
        "bolt11": "lnbcrt10n1pjmock",
        "payment_secret": "9f1c4a0e2b7d4f1e8a9b6c3d2e1f0a9b8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f",
        "created_index": 1
    }))
}

fn lightningd(request: &Value) -> Vec<String> {
    let id = request["id"].clone();
    let outcome = match request["method"].as_str().unwrap_or_default() {
        "getinfo" => Ok(project(node_info(), request.get("filter"))),
        "invoice" => invoice(&request["params"]),
        "listinvoices" => Ok(json!({"invoices": []})),
        "help" => Ok(json!({"help": [{"command": "getinfo"}], "format-hint": "simple"})),
        other => Err(json!({
            "code": -32601,
            "message": format!("Unknown command '{other}'")
        })),
    };
    let response = match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err(error) => json!({"jsonrpc": "2.0", "id": id, "error": error}),
    };
    vec![line(response)]
}

fn chatty(request: &Value) -> Vec<String> {
    let mut messages = vec![
        line(json!({
            "jsonrpc": "2.0",
            "method": "message",
            "params": {"id": request["id"], "level": "info", "message": "working"}
        })),
        line(json!({
            "jsonrpc": "2.0",
            "method": "progress",
            "params": {"id": request["id"], "num": 1, "total": 2}
        })),
    ];
    messages.extend(lightningd(request));
    messages
}

fn wrong_id(request: &Value) -> Vec<String> {
    let mut answered = request.clone();
    answered["id"] = json!("other:getinfo#9");
    lightningd(&answered)
}

fn unparseable(_request: &Value) -> Vec<String> {
    vec![line(json!({
        "jsonrpc": "2.0",
        "id": null,
        "error": {"code": -32700, "message": "Parse error"}
    }))]
}

fn garbage(_request: &Value) -> Vec<String> {
    vec!["this is not json\n".to_string()]
}

fn hang_up(_request: &Value) -> Vec<String> {
    Vec::new()
}

// Holds the connection open without answering.
fn stall(_request: &Value) -> Vec<String> {
    thread::sleep(Duration::from_secs(1));
    Vec::new()
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("args should be an object")
}

#[test]
fn getinfo_returns_daemon_report_unchanged() {
    let dir = unique_temp_dir("getinfo");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::new(&sock_path);
    let outcome = client.getinfo().expect("getinfo should succeed");
    assert_eq!(outcome, Outcome::Success(node_info()));

    let requests = daemon.finish();
    assert_eq!(
        requests[0],
        json!({"jsonrpc": "2.0", "id": "clnrpc:getinfo#1", "method": "getinfo", "params": {}})
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filtered_getinfo_returns_only_filtered_keys() {
    let dir = unique_temp_dir("filter");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::new(&sock_path);
    let outcome = client
        .getinfo_filtered(args(json!({"id": true})))
        .expect("filtered getinfo should succeed");
    assert_eq!(outcome, Outcome::Success(json!({"id": node_info()["id"]})));

    let requests = daemon.finish();
    assert_eq!(requests[0]["filter"], json!({"id": true}));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_command_is_returned_as_data() {
    let dir = unique_temp_dir("unknown");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::new(&sock_path);
    let outcome = client
        .call_raw("foo", Params::None)
        .expect("daemon errors are not client errors");
    assert_eq!(
        outcome.to_value(),
        json!({"code": -32601, "message": "Unknown command 'foo'"})
    );

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_required_parameter_raw_and_registered() {
    let dir = unique_temp_dir("missing");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::new(&sock_path);
    let incomplete = args(json!({"amount_msat": 1000, "description": "coffee"}));

    let outcome = client
        .call_raw("invoice", Params::Keyword(incomplete.clone()))
        .expect("raw call should reach the daemon");
    assert_eq!(
        outcome.to_value(),
        json!({"code": -32602, "message": "missing required parameter: label"})
    );

    let err = client
        .call("invoice", incomplete)
        .expect_err("registered call should fail locally");
    assert_eq!(err.category(), ErrorCategory::Validation);

    // Only the raw call reached the socket.
    assert_eq!(daemon.finish().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ids_count_per_method() {
    let dir = unique_temp_dir("ids");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 4, lightningd);

    let mut client = Client::new(&sock_path);
    client.getinfo().expect("getinfo #1");
    client.listinvoices(None).expect("listinvoices #1");
    client.getinfo().expect("getinfo #2");
    client.getinfo().expect("getinfo #3");

    let ids: Vec<Value> = daemon
        .finish()
        .into_iter()
        .map(|request| request["id"].clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            json!("clnrpc:getinfo#1"),
            json!("clnrpc:listinvoices#1"),
            json!("clnrpc:getinfo#2"),
            json!("clnrpc:getinfo#3"),
        ]
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn custom_id_prefix_is_sent() {
    let dir = unique_temp_dir("prefix");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::with_config(ClientConfig::new(&sock_path).with_id_prefix("my-app"));
    client.help(None).expect("help should succeed");

    let requests = daemon.finish();
    assert_eq!(requests[0]["id"], "my-app:help#1");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unset_optional_parameters_are_omitted() {
    let dir = unique_temp_dir("optional");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, lightningd);

    let mut client = Client::new(&sock_path);
    let options = InvoiceOptions {
        expiry: Some(60),
        ..InvoiceOptions::default()
    };
    let outcome = client
        .invoice(1000, "coffee", "one espresso", &options)
        .expect("invoice should succeed");
    assert!(outcome.is_success());

    let requests = daemon.finish();
    let params = requests[0]["params"]
        .as_object()
        .expect("params should be an object");
    let mut keys: Vec<&str> = params.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["amount_msat", "description", "expiry", "label"]);
    assert!(!params.contains_key("preimage"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn notifications_are_delivered_then_skipped() {
    let dir = unique_temp_dir("notify");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, chatty);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut client = Client::new(&sock_path);
    client.on_notification(move |notification| {
        sink.lock()
            .expect("notification log lock")
            .push(notification.method.clone());
    });

    let outcome = client.getinfo().expect("getinfo should succeed");
    assert_eq!(outcome, Outcome::Success(node_info()));
    assert_eq!(
        *seen.lock().expect("notification log lock"),
        vec!["message".to_string(), "progress".to_string()]
    );

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_response_id_is_protocol_error() {
    let dir = unique_temp_dir("mismatch");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, wrong_id);

    let mut client = Client::new(&sock_path);
    let err = client.getinfo().expect_err("mismatched id should fail");
    assert!(matches!(
        err,
        ClientError::Protocol(ProtocolError::IdMismatch { ref expected, ref actual })
            if expected == "clnrpc:getinfo#1" && actual == "other:getinfo#9"
    ));

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn null_id_error_is_returned_as_data() {
    let dir = unique_temp_dir("null-id");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, unparseable);

    let mut client = Client::new(&sock_path);
    let outcome = client.getinfo().expect("null-id error should be data");
    assert_eq!(
        outcome.to_value(),
        json!({"code": -32700, "message": "Parse error"})
    );

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_response_is_protocol_error() {
    let dir = unique_temp_dir("garbage");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, garbage);

    let mut client = Client::new(&sock_path);
    let err = client.getinfo().expect_err("garbage should fail");
    assert_eq!(err.category(), ErrorCategory::Protocol);

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn daemon_hang_up_is_transport_error() {
    let dir = unique_temp_dir("hangup");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, hang_up);

    let mut client = Client::new(&sock_path);
    let err = client.getinfo().expect_err("closed connection should fail");
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(!err.is_timeout());

    daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stalled_daemon_hits_read_timeout() {
    let dir = unique_temp_dir("stall");
    let sock_path = dir.join("lightning-rpc");
    let daemon = MockDaemon::bind(&sock_path, 1, stall);

    let config = ClientConfig::new(&sock_path).with_read_timeout(Some(Duration::from_millis(200)));
    let mut client = Client::with_config(config);
    let started = Instant::now();
    let err = client.getinfo().expect_err("silent daemon should time out");

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert!(started.elapsed() < Duration::from_secs(1));

    let requests = daemon.finish();
    assert_eq!(requests[0]["method"], "getinfo");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn read_timeout_is_unset_by_default() {
    let client = Client::new("/tmp/lightning-rpc");
    assert!(client.config().read_timeout.is_none());
    assert!(client.config().write_timeout.is_none());
}

#[test]
fn missing_socket_is_transport_error() {
    let dir = unique_temp_dir("absent");
    let mut client = Client::new(dir.join("lightning-rpc"));
    let err = client.getinfo().expect_err("no daemon is listening");
    assert!(matches!(err, ClientError::Transport(_)));
    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(target_os = "linux")]
#[test]
fn long_socket_path_behaves_like_short_path() {
    use std::os::fd::AsRawFd;

    let dir = unique_temp_dir("long");
    let mut long_dir = dir.clone();
    for segment in 0..6 {
        long_dir.push(format!("lightning-node-directory-{segment}"));
    }
    std::fs::create_dir_all(&long_dir).expect("long dir should be creatable");
    let long_path = long_dir.join("lightning-rpc");
    assert!(long_path.as_os_str().len() > clnrpc_transport::MAX_PATH_LEN);

    // Bind through a directory handle, as lightningd does in deep trees.
    let handle = std::fs::File::open(&long_dir).expect("directory should open");
    let proxy = format!("/proc/self/fd/{}/lightning-rpc", handle.as_raw_fd());
    let listener = UnixListener::bind(&proxy).expect("mock daemon should bind through fd");
    drop(handle);
    let long_daemon = MockDaemon::serve(listener, 1, lightningd);

    let short_path = dir.join("lightning-rpc");
    let short_daemon = MockDaemon::bind(&short_path, 1, lightningd);

    let long = Client::new(&long_path)
        .getinfo()
        .expect("long path getinfo should succeed");
    let short = Client::new(&short_path)
        .getinfo()
        .expect("short path getinfo should succeed");
    assert_eq!(long, short);
    assert!(long_path.exists());

    assert_eq!(long_daemon.finish()[0]["id"], "clnrpc:getinfo#1");
    short_daemon.finish();
    let _ = std::fs::remove_dir_all(&dir);
}
