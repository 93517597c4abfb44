use crate::protocol::TransportError;
use crate::transport::{Transport, not_connected};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// In-memory transport; the returned `DuplexStream` plays the server.
#[derive(Debug)]
pub(crate) struct MockTransport {
    stream: Option<DuplexStream>,
    open: bool,
    reject_writes: bool,
}

impl MockTransport {
    pub(crate) fn pair() -> (Self, DuplexStream) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        (Self { stream: Some(client), open: false, reject_writes: false }, server)
    }

    /// Every write fails with `BrokenPipe` while reads keep working.
    pub(crate) fn reject_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    fn stream_mut(&mut self) -> io::Result<&mut DuplexStream> {
        match &mut self.stream {
            Some(stream) if self.open => Ok(stream),
            _ => Err(not_connected()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self, _endpoint: SocketAddr) -> Result<(), TransportError> {
        self.open = self.stream.is_some();
        if self.open { Ok(()) } else { Err(TransportError::NotConnected) }
    }

    async fn handshake(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        self.stream.take().map(drop).ok_or(TransportError::NotConnected)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn scheme(&self) -> &'static str {
        "https"
    }
}

impl AsyncRead for MockTransport {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().stream_mut() {
            Ok(stream) => Pin::new(stream).poll_read(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

impl AsyncWrite for MockTransport {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.reject_writes {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        match this.stream_mut() {
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
