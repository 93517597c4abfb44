use crate::connection::{Endpoint, TlsContext};
use crate::protocol::ConnectionError;
use crate::transport::{PlainTransport, TlsTransport, Transport};
use rustls::pki_types::ServerName;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::lookup_host;
use tracing::{debug, info, warn};

/// A connected, handshaken byte stream to one host
///
/// `Connection` owns its [`Transport`] and exposes it as a tokio
/// `AsyncRead + AsyncWrite` stream. It is only ever handed out fully established:
/// either by [`Connection::establish`], which resolves and connects by itself, or by
/// [`Connection::open`] for a caller-supplied transport.
///
/// Dropping a `Connection` closes the transport.
#[derive(Debug)]
pub struct Connection {
    host: String,
    peer: SocketAddr,
    transport: Box<dyn Transport>,
}

impl Connection {
    /// Resolves `endpoint` and connects to the resolved addresses in order until one
    /// accepts, then runs the TLS handshake when a [`TlsContext`] is given.
    ///
    /// Resolution, connect and handshake all happen inside the returned future.
    /// Awaiting it inline on a task that also drives other work stalls that work
    /// until the connection is up or has failed.
    pub async fn establish(endpoint: &Endpoint, tls: Option<&TlsContext>) -> Result<Self, ConnectionError> {
        let host = endpoint.host();

        let server_name = match tls {
            Some(_) => Some(ServerName::try_from(host).map(|name| name.to_owned()).map_err(|e| {
                warn!(host, cause = %e, "host is not a valid tls server name");
                ConnectionError::invalid_server_name(host)
            })?),
            None => None,
        };

        let addresses = lookup_host((host, endpoint.port())).await.map_err(|e| ConnectionError::resolve(host, e))?;

        let mut last_error = None;
        for address in addresses {
            let transport: Box<dyn Transport> = match (tls, &server_name) {
                (Some(tls), Some(server_name)) => Box::new(TlsTransport::new(tls.config(), server_name.clone())),
                _ => Box::new(PlainTransport::new()),
            };

            match Self::open(host, address, transport).await {
                Ok(connection) => return Ok(connection),
                Err(e @ ConnectionError::Connect { .. }) => {
                    debug!(%address, cause = %e, "address refused, trying next one");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ConnectionError::no_address(host)))
    }

    /// Connects `transport` to `peer` and runs its handshake.
    pub async fn open<H: Into<String>>(host: H, peer: SocketAddr, mut transport: Box<dyn Transport>) -> Result<Self, ConnectionError> {
        let host = host.into();

        transport.connect(peer).await.map_err(|e| ConnectionError::connect(peer, e))?;
        transport.handshake().await.map_err(|e| ConnectionError::handshake(&host, e))?;

        info!(%host, %peer, scheme = transport.scheme(), "connection established");
        Ok(Self { host, peer, transport })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn scheme(&self) -> &'static str {
        self.transport.scheme()
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn get_stream(&self) -> &dyn Transport {
        &*self.transport
    }

    pub fn get_stream_mut(&mut self) -> &mut dyn Transport {
        &mut *self.transport
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if !self.transport.is_open() {
            return;
        }

        match self.transport.close() {
            Ok(()) => debug!(host = %self.host, peer = %self.peer, "connection closed"),
            Err(e) => warn!(host = %self.host, cause = %e, "failed to close connection"),
        }
    }
}

impl AsyncRead for Connection {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.transport).poll_read(cx, buf)
    }
}

impl AsyncWrite for Connection {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.transport).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.transport).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.transport).poll_shutdown(cx)
    }
}
