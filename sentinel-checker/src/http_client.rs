//! Ledger client speaking JSON over plain HTTP/1.
//!
//! Each call opens one connection, sends a single `GET`, and reads the whole
//! body. Proof checking is done by the ledger API; this adapter only moves
//! bytes and decodes them.

use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use sentinel_core::{Root, VerifiedItem};

use crate::client::LedgerClient;
use crate::wire::{self, ROOT_PATH};
use crate::LedgerError;

/// Default deadline for one request, covering connect through body read.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`LedgerClient`] backed by the ledger's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    /// `host:port` to connect to.
    addr: String,

    /// Value sent in the `Host` header.
    host: String,

    /// Path prefix prepended to every endpoint, without trailing slash.
    base_path: String,

    /// Deadline for a whole request.
    timeout: Duration,
}

impl HttpLedgerClient {
    /// Create a client for the ledger at `base_url` (e.g. `http://127.0.0.1:3323`).
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidUrl`] if the URL is not an absolute
    /// `http://` URL with a host.
    pub fn new(base_url: &str) -> Result<Self, LedgerError> {
        let invalid = |reason: &str| LedgerError::InvalidUrl {
            url: base_url.to_owned(),
            reason: reason.to_owned(),
        };

        let uri: Uri = base_url.parse().map_err(|_| invalid("not a valid URI"))?;
        if uri.scheme_str() != Some("http") {
            return Err(invalid("only http:// URLs are supported"));
        }
        let authority = uri.authority().ok_or_else(|| invalid("missing host"))?;
        let port = authority.port_u16().unwrap_or(80);

        Ok(Self {
            addr: format!("{}:{port}", authority.host()),
            host: authority.as_str().to_owned(),
            base_path: uri.path().trim_end_matches('/').to_owned(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Replace the per-request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return the `host:port` this client connects to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send a `GET` for `path` and return the body of a 2xx response.
    ///
    /// # Errors
    /// Returns [`LedgerError::Timeout`] if the exchange exceeds the deadline.
    async fn get(&self, path: &str) -> Result<Bytes, LedgerError> {
        tokio::time::timeout(self.timeout, self.exchange(path))
            .await
            .map_err(|_| LedgerError::Timeout {
                path: format!("{}{path}", self.base_path),
                after: self.timeout,
            })?
    }

    async fn exchange(&self, path: &str) -> Result<Bytes, LedgerError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| LedgerError::Connect { addr: self.addr.clone(), source })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| LedgerError::Http(format!("handshake with {}: {e}", self.addr)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("ledger connection closed: {e}");
            }
        });

        let full_path = format!("{}{path}", self.base_path);
        let uri: Uri = full_path
            .parse()
            .map_err(|e| LedgerError::Http(format!("invalid URI path {full_path}: {e}")))?;

        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("Host", &self.host)
            .header("Accept", "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| LedgerError::Http(format!("build request: {e}")))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| LedgerError::Http(format!("send request: {e}")))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| LedgerError::Http(format!("read response body: {e}")))?
            .to_bytes();

        if !status.is_success() {
            return Err(LedgerError::Status {
                status: status.as_u16(),
                path: full_path,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn current_root(&self) -> Result<Root, LedgerError> {
        let body = self.get(ROOT_PATH).await?;
        wire::decode_root(&body)
    }

    async fn verify_item(&self, index: u64) -> Result<VerifiedItem, LedgerError> {
        let body = self.get(&wire::item_path(index)).await?;
        wire::decode_item(index, &body)
    }
}
