use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("connection error: {source}")]
    Connection {
        #[from]
        source: ConnectionError,
    },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("protocol error: {source}")]
    Protocol {
        #[from]
        source: ProtocolError,
    },
}

impl From<io::Error> for HttpError {
    fn from(e: io::Error) -> Self {
        Self::Transport { source: TransportError::io(e) }
    }
}

/// Failures while establishing a [`Connection`](crate::connection::Connection).
///
/// All of them are fatal to the connection being built and are never retried here.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("can't resolve host {host}: {source}")]
    Resolve { host: String, source: io::Error },

    #[error("host {host} resolved to no address")]
    NoAddress { host: String },

    #[error("can't connect to {endpoint}: {source}")]
    Connect { endpoint: SocketAddr, source: TransportError },

    #[error("handshake with {host} failed: {source}")]
    Handshake { host: String, source: TransportError },

    #[error("invalid tls server name: {host}")]
    InvalidServerName { host: String },
}

impl ConnectionError {
    pub fn resolve<S: ToString>(host: S, source: io::Error) -> Self {
        Self::Resolve { host: host.to_string(), source }
    }

    pub fn no_address<S: ToString>(host: S) -> Self {
        Self::NoAddress { host: host.to_string() }
    }

    pub fn connect(endpoint: SocketAddr, source: TransportError) -> Self {
        Self::Connect { endpoint, source }
    }

    pub fn handshake<S: ToString>(host: S, source: TransportError) -> Self {
        Self::Handshake { host: host.to_string(), source }
    }

    pub fn invalid_server_name<S: ToString>(host: S) -> Self {
        Self::InvalidServerName { host: host.to_string() }
    }
}

/// Failures of the byte stream once it exists, including a peer closing it mid-message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("connection closed in the middle of a message")]
    UnexpectedEof,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl TransportError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// The peer sent bytes that are not a valid HTTP/1.1 response.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid status line: {reason}")]
    InvalidStatusLine { reason: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid chunk: {reason}")]
    InvalidChunk { reason: String },
}

impl ProtocolError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_status_line<S: ToString>(str: S) -> Self {
        Self::InvalidStatusLine { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_chunk<S: ToString>(str: S) -> Self {
        Self::InvalidChunk { reason: str.to_string() }
    }
}
