//! Connection establishment
//!
//! This module turns an [`Endpoint`] into a usable byte stream. It resolves the
//! host, connects to the resolved addresses in turn and, for TLS, performs the
//! handshake before handing the stream out.
//!
//! # Components
//!
//! - [`Endpoint`]: host and port, with `http`/`https` default ports
//! - [`TlsContext`]: shared rustls client configuration
//! - [`Connection`]: an established stream over a boxed [`Transport`](crate::transport::Transport)
//!
//! Establishing is an explicit async step; a [`Connection`] is never observable
//! half-connected.

mod endpoint;
mod http_connection;

pub use endpoint::Endpoint;
pub use endpoint::HTTP_PORT;
pub use endpoint::HTTPS_PORT;
pub use endpoint::TlsContext;
pub use http_connection::Connection;
