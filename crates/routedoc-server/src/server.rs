//! HTTP server.
//!
//! [`Server`] accepts HTTP/1 connections with hyper over a tokio
//! `TcpListener` and dispatches each request into an [`Engine`]. It stops
//! accepting on shutdown and waits up to the configured timeout for open
//! connections to finish.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use routedoc_config::ServerConfig;
use routedoc_core::{Response, ResponseExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::engine::Engine;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Errors from running a [`Server`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("invalid address '{addr}': {reason}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address being bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error on the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Serves an [`Engine`] over HTTP/1.
///
/// ```rust,ignore
/// use routedoc_config::ServerConfig;
/// use routedoc_server::{Engine, Server};
///
/// #[tokio::main]
/// async fn main() -> Result<(), routedoc_server::ServerError> {
///     let engine = Engine::new();
///     Server::new(engine, ServerConfig::default()).run().await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Server {
    engine: Engine,
    config: ServerConfig,
}

impl Server {
    /// Creates a server for `engine`.
    #[must_use]
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        Self { engine, config }
    }

    /// The engine requests are dispatched to.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the address is invalid or cannot be bound.
    pub async fn run(self) -> ServerResult<()> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr: SocketAddr =
            self.config
                .http_addr
                .parse()
                .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                    addr: self.config.http_addr.clone(),
                    reason: e.to_string(),
                })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound `listener`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener's address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();
        let stop = shutdown.recv();
        tokio::pin!(stop);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(remote_addr = %remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to accept connection");
                    }
                },
                () = &mut stop => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = server.config.shutdown_timeout();
        tracing::info!(
            active_connections = tracker.active_connections(),
            timeout_secs = timeout.as_secs(),
            "draining connections"
        );
        if tokio::time::timeout(timeout, tracker.wait_for_shutdown()).await.is_err() {
            tracing::warn!(
                active_connections = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let service = service_fn(move |request: http::Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(remote_addr = %remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, request: http::Request<Incoming>) -> Response {
        let timeout: Duration = self.config.request_timeout();
        let (parts, body) = request.into_parts();

        let body = match tokio::time::timeout(timeout, body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read request body");
                return Response::json_error(
                    StatusCode::BAD_REQUEST,
                    "BODY_READ_ERROR",
                    &format!("failed to read request body: {e}"),
                );
            }
            Err(_) => {
                return Response::json_error(
                    StatusCode::REQUEST_TIMEOUT,
                    "REQUEST_TIMEOUT",
                    "request body was not received in time",
                );
            }
        };

        let request = http::Request::from_parts(parts, Full::<Bytes>::new(body));
        match tokio::time::timeout(timeout, self.engine.dispatch(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX), "handler timed out");
                Response::json_error(
                    StatusCode::GATEWAY_TIMEOUT,
                    "HANDLER_TIMEOUT",
                    "handler did not complete in time",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use routedoc_core::handler_fn;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_invalid_address() {
        let config = ServerConfig {
            http_addr: "nowhere".to_string(),
            ..ServerConfig::default()
        };
        let result = Server::new(Engine::new(), config)
            .run_with_shutdown(ShutdownSignal::new())
            .await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_serves_and_shuts_down() {
        let engine = Engine::new();
        engine
            .add_route(
                &Method::GET,
                "/ping",
                vec![handler_fn("ping", |_ctx, _next| {
                    Box::pin(async { Response::with_body(StatusCode::OK, "text/plain", "pong") })
                })],
            )
            .unwrap();

        let config = ServerConfig {
            shutdown_timeout_secs: 1,
            ..ServerConfig::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = ShutdownSignal::new();
        let handle = tokio::spawn(Server::new(engine, config).serve(listener, shutdown.clone()));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.ends_with("pong"));

        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
