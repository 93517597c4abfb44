use crate::protocol::TransportError;
use crate::transport::{Transport, not_connected};
use async_trait::async_trait;
use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::{fmt, io, mem};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tracing::debug;

enum State {
    Idle,
    Connected(TcpStream),
    Established(Box<TlsStream<TcpStream>>),
    Closed,
}

/// TLS over TCP. Only usable for I/O once [`Transport::handshake`] succeeded.
pub struct TlsTransport {
    config: Arc<ClientConfig>,
    server_name: ServerName<'static>,
    state: State,
}

impl TlsTransport {
    pub fn new(config: Arc<ClientConfig>, server_name: ServerName<'static>) -> Self {
        Self { config, server_name, state: State::Idle }
    }

    fn stream_mut(&mut self) -> io::Result<&mut TlsStream<TcpStream>> {
        match &mut self.state {
            State::Established(stream) => Ok(stream),
            _ => Err(not_connected()),
        }
    }
}

impl Debug for TlsTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Idle => "idle",
            State::Connected(_) => "connected",
            State::Established(_) => "established",
            State::Closed => "closed",
        };
        f.debug_struct("TlsTransport").field("server_name", &self.server_name).field("state", &state).finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn connect(&mut self, endpoint: SocketAddr) -> Result<(), TransportError> {
        let stream = TcpStream::connect(endpoint).await?;
        stream.set_nodelay(true)?;
        debug!(%endpoint, "tcp connected, tls handshake pending");
        self.state = State::Connected(stream);
        Ok(())
    }

    async fn handshake(&mut self) -> Result<(), TransportError> {
        let stream = match mem::replace(&mut self.state, State::Closed) {
            State::Connected(stream) => stream,
            other => {
                self.state = other;
                return Err(TransportError::NotConnected);
            }
        };

        let connector = TlsConnector::from(Arc::clone(&self.config));
        let stream = connector.connect(self.server_name.clone(), stream).await?;
        debug!(server_name = ?self.server_name, "tls handshake finished");
        self.state = State::Established(Box::new(stream));
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        match mem::replace(&mut self.state, State::Closed) {
            State::Idle | State::Closed => Err(TransportError::NotConnected),
            State::Connected(_) | State::Established(_) => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        matches!(self.state, State::Connected(_) | State::Established(_))
    }

    fn scheme(&self) -> &'static str {
        "https"
    }
}

impl AsyncRead for TlsTransport {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_read(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

impl AsyncWrite for TlsTransport {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_write(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_flush(cx),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_shutdown(cx),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}
