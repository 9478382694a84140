//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and runs each one in its own task. A connection
//! cycles through reading, dispatching and writing until the router asks for
//! it to be closed or the peer goes away. A failure inside one connection
//! never reaches the accept loop.

use std::future::{self, Future};
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::http::request::{MAX_REQUEST_SIZE, Request, RequestError};
use crate::http::response::EncodeError;
use crate::router::{Disposition, Router};

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end a single connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    Malformed(#[from] RequestError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Initial read buffer capacity per connection.
const INITIAL_BUF_SIZE: usize = 4096;

/// The HTTP server.
///
/// # Examples
///
/// ```rust,no_run
/// use tcp_http::server::Server;
/// use tcp_http::storage::StaticFiles;
/// use tcp_http::Router;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Server::bind("0.0.0.0:4221").await?;
///     server.run(Router::builtin(StaticFiles::new("/tmp"))).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound
    /// (e.g. port already in use, insufficient permissions).
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections forever, dispatching requests through `router`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the TCP listener itself fails.
    pub async fn run(self, router: Router) -> Result<(), ServerError> {
        self.run_until(router, future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Connections already in flight keep running in their own tasks.
    pub async fn run_until(
        self,
        router: Router,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        let router = Arc::new(router);
        info!(address = %self.local_addr, "listening");

        tokio::pin!(shutdown);

        loop {
            let (stream, peer_addr) = tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
            };

            debug!(peer = %peer_addr, "connection accepted");
            let router = Arc::clone(&router);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, &router).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Drives one connection: read → decode → dispatch → encode → write, repeated
/// while the router keeps the connection alive.
///
/// Bytes are buffered until a full request (headers plus `Content-Length`
/// body) is present, so a request split across several reads is handled.
/// Leftover bytes are kept for the next cycle.
pub async fn handle_connection<S>(
    mut stream: S,
    peer_addr: SocketAddr,
    router: &Router,
) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);

    loop {
        let (request, consumed) = loop {
            match Request::parse(&buf) {
                Ok(pair) => break pair,
                Err(RequestError::Incomplete) => {}
                Err(e) => return Err(e.into()),
            }

            if buf.len() > MAX_REQUEST_SIZE {
                return Err(RequestError::TooLarge {
                    max_bytes: MAX_REQUEST_SIZE,
                }
                .into());
            }

            if stream.read_buf(&mut buf).await? == 0 {
                debug!(peer = %peer_addr, "connection closed by peer");
                return Ok(());
            }
        };

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let routed = router.route(request).await;
        debug!(
            peer = %peer_addr,
            status = routed.response.status().as_u16(),
            "request handled"
        );

        let bytes = routed.response.into_bytes()?;
        stream.write_all(&bytes).await?;
        stream.flush().await?;

        // Drop the consumed request bytes from the buffer.
        let _ = buf.split_to(consumed);

        if routed.disposition == Disposition::Close {
            debug!(peer = %peer_addr, "closing connection");
            break;
        }
    }

    Ok(())
}
