use std::path::{Path, PathBuf};

use clnrpc_frame::{MessageReader, MessageWriter};
use clnrpc_schema::MethodRegistry;
use clnrpc_transport::RpcStream;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ProtocolError, Result};
use crate::id::IdGenerator;
use crate::params::{Params, ParamsError};
use crate::request::Request;
use crate::response::{parse, Message, Notification, Outcome, Response};

/// Callback for notifications the daemon sends while a call is pending.
pub type NotificationHandler = Box<dyn FnMut(&Notification) + Send>;

/// JSON-RPC client bound to one daemon socket.
///
/// Every call opens a fresh connection and closes it before returning.
pub struct Client {
    config: ClientConfig,
    ids: IdGenerator,
    registry: MethodRegistry,
    notification_handler: Option<NotificationHandler>,
}

impl Client {
    /// Client for `socket_path` with default configuration.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self::with_config(ClientConfig::new(socket_path))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            ids: IdGenerator::new(config.id_prefix.clone()),
            config,
            registry: MethodRegistry::builtin(),
            notification_handler: None,
        }
    }

    /// Replace the method registry used by [`Client::call`].
    pub fn with_registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Deliver notifications received during calls to `handler`.
    pub fn on_notification<F>(&mut self, handler: F)
    where
        F: FnMut(&Notification) + Send + 'static,
    {
        self.notification_handler = Some(Box::new(handler));
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MethodRegistry {
        &mut self.registry
    }

    /// The id the next call to `method` will carry.
    pub fn next_id(&self, method: &str) -> String {
        self.ids.peek(method)
    }

    /// Send one request and return the correlated response.
    pub fn request(&mut self, method: &str, params: Params) -> Result<Response> {
        let id = self.ids.next(method);
        let request = Request::build(method, params, id);
        self.exchange(&request)
    }

    /// Ad-hoc call of any method, bypassing the registry.
    pub fn call_raw(&mut self, method: &str, params: Params) -> Result<Outcome> {
        self.request(method, params).map(|response| response.outcome)
    }

    /// Call a registered method with keyword arguments.
    ///
    /// Arguments are checked locally first; a missing or unknown parameter
    /// fails without touching the socket.
    pub fn call(&mut self, method: &str, args: Map<String, Value>) -> Result<Outcome> {
        let params = self.registry.prepare(method, args, false)?;
        self.call_raw(method, Params::Keyword(params))
    }

    /// Like [`Client::call`], with a filter applied by the daemon.
    pub fn call_filtered(
        &mut self,
        method: &str,
        args: Map<String, Value>,
        filter: Map<String, Value>,
    ) -> Result<Outcome> {
        let params = self.registry.prepare(method, args, true)?;
        self.call_raw(method, Params::Filtered { params, filter })
    }

    /// Call a registered method with arguments taken from a serializable struct.
    pub fn call_with<T: Serialize + ?Sized>(&mut self, method: &str, args: &T) -> Result<Outcome> {
        let args = to_args(args)?;
        self.call(method, args)
    }

    fn exchange(&mut self, request: &Request) -> Result<Response> {
        let stream = connect(&self.config.socket_path)?;
        let reader_stream = stream.try_clone()?;

        let frame_config = self.config.frame_config();
        let mut writer = MessageWriter::with_config_rpc(stream, frame_config.clone())?;
        let mut reader = MessageReader::with_config_rpc(reader_stream, frame_config)?;

        trace!(id = %request.id, method = %request.method, "sending request");
        writer.send(request)?;

        loop {
            let response = match parse(reader.read_message()?)? {
                Message::Notification(notification) => {
                    debug!(
                        id = %request.id,
                        method = %notification.method,
                        "notification while waiting for response"
                    );
                    if let Some(handler) = self.notification_handler.as_mut() {
                        handler(&notification);
                    }
                    continue;
                }
                Message::Response(response) => response,
            };

            match response.id.as_deref() {
                Some(id) if id == request.id => {}
                // lightningd answers requests it could not parse far enough
                // to read an id with `"id": null`.
                None if !response.outcome.is_success() => {}
                actual => {
                    return Err(ProtocolError::IdMismatch {
                        expected: request.id.clone(),
                        actual: actual.unwrap_or("null").to_string(),
                    }
                    .into())
                }
            }

            trace!(id = %request.id, success = response.outcome.is_success(), "received response");
            return Ok(response);
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("notification_handler", &self.notification_handler.is_some())
            .finish()
    }
}

pub(crate) fn to_args<T: Serialize + ?Sized>(args: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(args)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ParamsError::InvalidKeyword.into()),
    }
}

#[cfg(unix)]
fn connect(path: &Path) -> Result<RpcStream> {
    Ok(clnrpc_transport::connect(path)?)
}

#[cfg(not(unix))]
fn connect(path: &Path) -> Result<RpcStream> {
    Err(clnrpc_transport::TransportError::Connect {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "lightningd RPC requires Unix domain sockets",
        ),
    }
    .into())
}
