//! Metrics sources.
//!
//! `HttpSource` issues a plain HTTP/1.1 GET against the configured endpoint
//! and decodes the JSON body into a `MetricsSnapshot`.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, HOST, USER_AGENT};
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use tracing::debug;

use pulse_core::{ConfigError, DEFAULT_TIMEOUT, MetricsSnapshot, PollError};

pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Something that can produce the latest metrics snapshot.
pub trait MetricsSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<MetricsSnapshot, PollError>>;
}

/// A parsed `http://host[:port]/path` metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `host:port` to connect to.
    address: String,
    /// Value for the `Host` header.
    host: String,
    /// Origin-form request target.
    path: String,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let uri: Uri = url
            .parse()
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{url}: {e}")))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return Err(ConfigError::InvalidEndpoint(format!(
                    "{url}: unsupported scheme `{other}`"
                )));
            }
            None => {
                return Err(ConfigError::InvalidEndpoint(format!("{url}: missing scheme")));
            }
        }

        let authority = uri
            .authority()
            .ok_or_else(|| ConfigError::InvalidEndpoint(format!("{url}: missing host")))?;
        let port = authority.port_u16().unwrap_or(80);
        let path = uri
            .path_and_query()
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or("/");

        Ok(Self {
            address: format!("{}:{port}", authority.host()),
            host: authority.as_str().to_string(),
            path: path.to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}{}", self.host, self.path)
    }
}

/// Fetches snapshots from an HTTP `/metrics` endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: Endpoint,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn fetch_snapshot(&self) -> Result<MetricsSnapshot, PollError> {
        let body = tokio::time::timeout(self.timeout, get_body(&self.endpoint))
            .await
            .map_err(|_| {
                debug!(endpoint = %self.endpoint, "metrics request timed out");
                PollError::Transport(format!(
                    "request to {} timed out after {}ms",
                    self.endpoint,
                    self.timeout.as_millis()
                ))
            })??;

        MetricsSnapshot::from_json(&body)
    }
}

impl MetricsSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'_, Result<MetricsSnapshot, PollError>> {
        Box::pin(self.fetch_snapshot())
    }
}

/// GET the endpoint and return the body of a 2xx response.
async fn get_body(endpoint: &Endpoint) -> Result<Bytes, PollError> {
    let stream = tokio::net::TcpStream::connect(endpoint.address())
        .await
        .map_err(|e| {
            debug!(error = %e, %endpoint, "metrics connection failed");
            PollError::Transport(format!("connection to {} failed: {e}", endpoint.address()))
        })?;

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| PollError::Transport(format!("handshake with {} failed: {e}", endpoint.address())))?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "metrics connection closed with error");
        }
    });

    let req = Request::builder()
        .method(Method::GET)
        .uri(endpoint.path())
        .header(HOST, &endpoint.host)
        .header(USER_AGENT, concat!("pulsewatch/", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, "application/json")
        .body(Empty::<Bytes>::new())
        .map_err(|e| PollError::Transport(format!("invalid request: {e}")))?;

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| PollError::Transport(format!("request to {endpoint} failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        debug!(%status, %endpoint, "metrics endpoint returned non-2xx");
        return Err(PollError::Transport(format!(
            "Network response was not ok: {} (status: {})",
            status.canonical_reason().unwrap_or("Unknown"),
            status.as_u16()
        )));
    }

    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| PollError::Transport(format!("reading body from {endpoint} failed: {e}")))?
        .to_bytes();

    Ok(body)
}
