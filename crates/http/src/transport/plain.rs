use crate::protocol::TransportError;
use crate::transport::{Transport, not_connected};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tracing::debug;

/// Plain TCP transport.
#[derive(Debug, Default)]
pub struct PlainTransport {
    stream: Option<TcpStream>,
}

impl PlainTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream_mut(&mut self) -> io::Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(not_connected)
    }
}

#[async_trait]
impl Transport for PlainTransport {
    async fn connect(&mut self, endpoint: SocketAddr) -> Result<(), TransportError> {
        let stream = TcpStream::connect(endpoint).await?;
        stream.set_nodelay(true)?;
        debug!(%endpoint, "tcp connected");
        self.stream = Some(stream);
        Ok(())
    }

    async fn handshake(&mut self) -> Result<(), TransportError> {
        if self.stream.is_some() { Ok(()) } else { Err(TransportError::NotConnected) }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.stream.take().map(drop).ok_or(TransportError::NotConnected)
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn scheme(&self) -> &'static str {
        "http"
    }
}

impl AsyncRead for PlainTransport {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_read(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

impl AsyncWrite for PlainTransport {
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
