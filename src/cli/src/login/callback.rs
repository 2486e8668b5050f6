//! One-shot localhost listener for the wallet's `success_url` redirect.

use crate::errors::LoginError;
use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, trace};

const SUCCESS_HTML: &str =
    "<html><body><h1>Thanks!</h1><p>You can close this window now and return to NEAR Shell.</p></body></html>";
const ERROR_HTML: &str =
    "<html><body><h1>Login failed</h1><p>NEAR Shell could not read this request. Please enter your account id in the terminal.</p></body></html>";

const MAX_REQUEST_BYTES: usize = 8192;

/// Query parameters captured from the callback request.
pub type Payload = HashMap<String, String>;

/// A bound callback address the wallet can redirect to.
pub trait CallbackEndpoint: Send {
    /// URL to hand the wallet as `success_url`.
    fn url(&self) -> String;
}

/// Receives the single redirect that ends a wallet login.
#[async_trait]
pub trait CallbackListener: Send + Sync {
    type Endpoint: CallbackEndpoint;

    /// Binds a fresh endpoint.
    async fn acquire_endpoint(&self) -> Result<Self::Endpoint, LoginError>;

    /// Waits for one request on `endpoint` and returns the listed query keys
    /// it carried. The endpoint is consumed and unbound on every path.
    async fn await_payload(&self, endpoint: Self::Endpoint, keys: &[&str]) -> Result<Payload, LoginError>;
}

/// A listener bound on the loopback interface.
#[derive(Debug)]
pub struct LocalEndpoint {
    addr: SocketAddr,
    listener: TcpListener,
}

impl LocalEndpoint {
    /// Gets the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl CallbackEndpoint for LocalEndpoint {
    fn url(&self) -> String {
        format!("http://{}:{}", self.addr.ip(), self.addr.port())
    }
}

/// Callback listener on a local TCP port.
#[derive(Debug, Clone)]
pub struct LocalCallbackListener {
    host: IpAddr,
    ports: RangeInclusive<u16>,
    timeout: Duration,
}

impl Default for LocalCallbackListener {
    fn default() -> Self {
        Self::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            3000..=4000,
            Duration::from_secs(crate::config::DEFAULT_LOGIN_TIMEOUT_SECS),
        )
    }
}

impl LocalCallbackListener {
    /// Creates a listener that takes the first free port in `ports` on `host`.
    pub fn new(host: IpAddr, ports: RangeInclusive<u16>, timeout: Duration) -> Self {
        Self { host, ports, timeout }
    }

    /// Same as `default` with a different capture timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CallbackListener for LocalCallbackListener {
    type Endpoint = LocalEndpoint;

    async fn acquire_endpoint(&self) -> Result<LocalEndpoint, LoginError> {
        for port in self.ports.clone() {
            match TcpListener::bind((self.host, port)).await {
                Ok(listener) => {
                    let addr = listener
                        .local_addr()
                        .map_err(|e| LoginError::ListenerUnavailable(format!("{}:{} ({})", self.host, port, e)))?;
                    debug!("Callback listener bound on {}", addr);
                    return Ok(LocalEndpoint { addr, listener });
                }
                Err(e) => trace!("Port {} unavailable: {}", port, e),
            }
        }

        Err(LoginError::ListenerUnavailable(format!(
            "no free port in {}..={} on {}",
            self.ports.start(),
            self.ports.end(),
            self.host
        )))
    }

    async fn await_payload(&self, endpoint: LocalEndpoint, keys: &[&str]) -> Result<Payload, LoginError> {
        let LocalEndpoint { addr, listener } = endpoint;

        let result = match tokio::time::timeout(self.timeout, capture_one(&listener, keys)).await {
            Ok(result) => result,
            Err(_) => Err(LoginError::PayloadCaptureFailed(format!(
                "No callback received on {} within {:?}",
                addr, self.timeout
            ))),
        };

        drop(listener);
        debug!("Callback listener on {} released", addr);
        result
    }
}

/// Waits for the first request on any accepted connection, answers it, and
/// returns the requested keys. Connections that close without sending a
/// request (e.g. browser preconnects) are skipped.
async fn capture_one(listener: &TcpListener, keys: &[&str]) -> Result<Payload, LoginError> {
    let keys: Arc<Vec<String>> = Arc::new(keys.iter().map(|key| key.to_string()).collect());
    // Dropping the set aborts connections still waiting
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted
                    .map_err(|e| LoginError::PayloadCaptureFailed(format!("Callback accept failed: {}", e)))?;
                debug!("Callback connection from {}", peer);
                connections.spawn(answer_request(socket, keys.clone()));
            }
            Some(joined) = connections.join_next() => match joined {
                Ok(Some(payload)) => return payload,
                Ok(None) => trace!("Callback connection closed without a request"),
                Err(e) => debug!("Callback connection task failed: {}", e),
            },
        }
    }
}

/// Reads one request from `socket` and answers it. `None` means the peer
/// went away before sending anything.
async fn answer_request(mut socket: TcpStream, keys: Arc<Vec<String>>) -> Option<Result<Payload, LoginError>> {
    let request = match read_request_head(&mut socket).await {
        Ok(Some(request)) => request,
        Ok(None) => return None,
        Err(e) => {
            trace!("Callback read failed: {}", e);
            return None;
        }
    };

    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    let payload = extract_request_target(&request).and_then(|target| parse_callback_target(target, &keys));

    let (status, body) = match payload {
        Ok(_) => ("HTTP/1.1 200 OK", SUCCESS_HTML),
        Err(_) => ("HTTP/1.1 400 Bad Request", ERROR_HTML),
    };
    let response = format!(
        "{}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    // The browser may already be gone; the payload is what matters
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;

    Some(payload)
}

/// Reads until the end of the request headers or the size cap. `None` when
/// the peer closed without sending anything.
async fn read_request_head(socket: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut buffer = vec![0u8; MAX_REQUEST_BYTES];
    let mut filled = 0;
    loop {
        let size = socket.read(&mut buffer[filled..]).await?;
        filled += size;
        if size == 0 || filled == buffer.len() || buffer[..filled].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    if filled == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buffer[..filled]).into_owned()))
}

fn extract_request_target(request: &str) -> Result<&str, LoginError> {
    let first = request
        .lines()
        .next()
        .ok_or_else(|| LoginError::PayloadCaptureFailed("Malformed callback request".to_string()))?;
    let mut parts = first.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    if method != "GET" || target.is_empty() {
        return Err(LoginError::PayloadCaptureFailed(format!(
            "Callback must be a GET request, got '{}'",
            first
        )));
    }
    Ok(target)
}

/// Picks `keys` out of a request target's query string. Keys that are absent
/// are simply missing from the result.
pub(crate) fn parse_callback_target(target: &str, keys: &[&str]) -> Result<Payload, LoginError> {
    let url = Url::parse(&format!("http://127.0.0.1{}", target))
        .map_err(|e| LoginError::PayloadCaptureFailed(format!("Invalid callback target: {}", e)))?;

    Ok(url
        .query_pairs()
        .filter(|(key, _)| keys.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}
