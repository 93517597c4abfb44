//! Byte-stream transports the client runs over
//!
//! A [`Transport`] is an `AsyncRead + AsyncWrite` stream with an explicit
//! lifecycle: it starts unconnected, is connected to one socket address, performs a
//! handshake (a no-op for plain TCP) and is finally closed.
//!
//! # Components
//!
//! - [`PlainTransport`]: plain TCP
//! - [`TlsTransport`]: TCP upgraded to TLS through `tokio-rustls`
//!
//! Callers hold a `Box<dyn Transport>` so nothing above this module needs to know
//! which variant carries the bytes.

mod plain;
mod tls;

#[cfg(test)]
pub(crate) mod mock;

pub use plain::PlainTransport;
pub use tls::TlsTransport;

use crate::protocol::TransportError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

#[async_trait]
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send + Debug {
    /// Opens the underlying TCP connection.
    async fn connect(&mut self, endpoint: SocketAddr) -> Result<(), TransportError>;

    /// Completes whatever negotiation the transport needs after `connect`.
    async fn handshake(&mut self) -> Result<(), TransportError>;

    /// Releases the socket. Further I/O fails with `NotConnected`.
    fn close(&mut self) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    /// `"http"` or `"https"`, only used to render URIs.
    fn scheme(&self) -> &'static str;
}

pub(crate) fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, TransportError::NotConnected)
}
