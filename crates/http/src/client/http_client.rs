use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::client::engine::Engine;
use crate::connection::Connection;
use crate::handler::Handler;
use crate::protocol::{Request, RequestTarget, TransportError};

/// Initial capacity of the read buffer; it grows when a single frame needs more.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// A streaming HTTP/1.1 client bound to one established [`Connection`]
///
/// Configure the request target with the builder methods, then [`start`](Self::start)
/// the engine. Responses keep being read and handed to the handler for as long as the
/// peer keeps the connection open, which is what a long-lived streaming endpoint needs.
#[derive(Debug)]
pub struct HttpClient {
    connection: Connection,
    target: RequestTarget,
    read_buffer_size: usize,
}

impl HttpClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection, target: RequestTarget::new("/"), read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }

    #[must_use]
    pub fn path<P: Into<String>>(mut self, path: P) -> Self {
        self.target.path = path.into();
        self
    }

    #[must_use]
    pub fn query<Q: Into<String>>(mut self, query: Q) -> Self {
        self.target.query = query.into();
        self
    }

    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.target.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// `<scheme>://<host><path>`, the base string an OAuth signer needs.
    pub fn uri(&self) -> String {
        format!("{}://{}{}", self.connection.scheme(), self.connection.host(), self.target.path)
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Spawns the engine on the current tokio runtime and starts reading at once.
    pub fn start<H: Handler + 'static>(self, handler: H) -> ClientHandle {
        let (sender, requests) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let connected = Arc::new(AtomicBool::new(true));
        let host = self.connection.host().to_owned();

        let engine = Engine {
            handler,
            requests,
            cancel: cancel.clone(),
            connected: Arc::clone(&connected),
            read_buffer_size: self.read_buffer_size,
        };
        let task = tokio::spawn(engine.run(self.connection));

        ClientHandle { host, target: self.target, sender, cancel, connected, task: Some(task) }
    }
}

/// Controls a running client engine
///
/// Dropping the handle cancels the engine: the task stops at its next await point and
/// the handler is not invoked again, not even with an end notification.
#[derive(Debug)]
pub struct ClientHandle {
    host: String,
    target: RequestTarget,
    sender: mpsc::UnboundedSender<Request>,
    cancel: CancellationToken,
    connected: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ClientHandle {
    /// Queues a `GET` for the current target.
    pub fn request(&self) -> Result<(), TransportError> {
        self.send(Bytes::new())
    }

    /// Queues a `POST` for the current target, or a `GET` when `body` is empty.
    pub fn request_with_body<B: Into<Bytes>>(&self, body: B) -> Result<(), TransportError> {
        self.send(body.into())
    }

    fn send(&self, body: Bytes) -> Result<(), TransportError> {
        let request = Request::new(self.host.clone(), self.target.clone(), body);
        self.sender.send(request).map_err(|e| {
            warn!(host = %self.host, target = %e.0.target().path_and_query(), "engine stopped, request dropped");
            TransportError::NotConnected
        })
    }

    /// Path, query and headers used by later requests. Already queued ones keep theirs.
    pub fn target_mut(&mut self) -> &mut RequestTarget {
        &mut self.target
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Stops the engine. No handler invocation starts after this returns.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire) && !self.cancel.is_cancelled()
    }

    /// Waits for the engine to finish, which for a live stream is when the peer
    /// closes it or it fails.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            error!(host = %self.host, cause = %e, "client engine panicked or was aborted");
        }
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Delivery, StreamEnd, make_handler};
    use crate::protocol::ProtocolError;
    use crate::transport::mock::MockTransport;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn client() -> (HttpClient, DuplexStream) {
        let (transport, server) = MockTransport::pair();
        let connection = Connection::open("userstream.twitter.com", "127.0.0.1:443".parse().unwrap(), Box::new(transport)).await.unwrap();
        (HttpClient::new(connection), server)
    }

    fn start(client: HttpClient) -> (ClientHandle, UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = make_handler(move |delivery| {
            let tx = tx.clone();
            async move {
                tx.send(delivery).unwrap();
            }
        });
        (client.start(handler), rx)
    }

    async fn expect_message(rx: &mut UnboundedReceiver<Delivery>) -> crate::protocol::Response {
        match rx.recv().await {
            Some(Delivery::Message(response)) => response,
            other => panic!("expect message, got {other:?}"),
        }
    }

    async fn expect_end(rx: &mut UnboundedReceiver<Delivery>) -> StreamEnd {
        match rx.recv().await {
            Some(Delivery::End(end)) => end,
            other => panic!("expect end, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn uri_uses_scheme_host_and_path() {
        let (client, _server) = client().await;
        let client = client.path("/2/user.json").query("with=followings");
        assert_eq!(client.uri(), "https://userstream.twitter.com/2/user.json");
    }

    #[tokio::test]
    async fn writes_request_bytes() {
        let (client, mut server) = client().await;
        let (mut handle, _rx) = start(client.path("/1/x.json").query("q=1"));

        handle.target_mut().headers.insert("Connection", "close");
        handle.request().unwrap();

        let expected = "GET /1/x.json?q=1 HTTP/1.1\r\nHost: userstream.twitter.com\r\nConnection: close\r\n\r\n";
        let mut buf = vec![0u8; expected.len()];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[tokio::test]
    async fn writes_post_body() {
        let (client, mut server) = client().await;
        let (handle, _rx) = start(client.path("/1/statuses/update.json"));

        handle.request_with_body("status=hello").unwrap();

        let expected = "POST /1/statuses/update.json HTTP/1.1\r\nHost: userstream.twitter.com\r\nContent-Length: 12\r\n\r\nstatus=hello";
        let mut buf = vec![0u8; expected.len()];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[tokio::test]
    async fn content_length_message_then_eof() {
        let (client, mut server) = client().await;
        let (handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\n{\"a\":[1,2]}").await.unwrap();

        let response = expect_message(&mut rx).await;
        assert_eq!(response.status().code(), 200);
        assert_eq!(response.headers().get("Content-Length"), Some("11"));
        assert_eq!(&response.body()[..], br#"{"a":[1,2]}"#);

        drop(server);
        assert!(expect_end(&mut rx).await.is_eof());
        assert!(rx.recv().await.is_none());
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn chunked_message_delivered_once() {
        let (client, mut server) = client().await;
        let (_handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n").await.unwrap();
        drop(server);

        assert_eq!(&expect_message(&mut rx).await.body()[..], b"hello");
        assert!(expect_end(&mut rx).await.is_eof());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn every_chunk_is_a_message() {
        let (client, mut server) = client().await;
        let (_handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n").await.unwrap();
        server.write_all(b"7\r\n{\"a\":1}\r\n").await.unwrap();
        assert_eq!(&expect_message(&mut rx).await.body()[..], br#"{"a":1}"#);

        server.write_all(b"7\r\n{\"b\":2}\r\n").await.unwrap();
        let response = expect_message(&mut rx).await;
        assert_eq!(&response.body()[..], br#"{"b":2}"#);
        assert_eq!(response.headers().get("Transfer-Encoding"), Some("chunked"));
    }

    #[tokio::test]
    async fn clean_eof_ends_once() {
        let (client, server) = client().await;
        let (_handle, mut rx) = start(client);

        drop(server);
        assert!(expect_end(&mut rx).await.is_eof());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn eof_mid_body_is_transport_error() {
        let (client, mut server) = client().await;
        let (_handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc").await.unwrap();
        drop(server);

        assert!(matches!(expect_end(&mut rx).await, StreamEnd::Transport(TransportError::UnexpectedEof)));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn malformed_status_line_is_protocol_error() {
        let (client, mut server) = client().await;
        let (_handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 abc OK\r\n\r\n").await.unwrap();

        assert!(matches!(expect_end(&mut rx).await, StreamEnd::Protocol(ProtocolError::InvalidStatusLine { .. })));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn abort_suppresses_deliveries() {
        let (client, mut server) = client().await;
        let (handle, mut rx) = start(client);

        handle.abort();
        assert!(!handle.is_connected());
        let _ = server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}").await;
        handle.join().await;

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn drop_suppresses_deliveries() {
        let (client, mut server) = client().await;
        let (handle, mut rx) = start(client);

        drop(handle);
        let _ = server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}").await;
        drop(server);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn abort_while_reading_suppresses_later_responses() {
        let (client, mut server) = client().await;
        let (handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}").await.unwrap();
        assert_eq!(&expect_message(&mut rx).await.body()[..], b"{}");

        handle.abort();
        let _ = server.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]").await;
        handle.join().await;

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn drop_while_reading_suppresses_later_responses() {
        let (client, mut server) = client().await;
        let (handle, mut rx) = start(client);

        server.write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\n{}\r\n").await.unwrap();
        assert_eq!(&expect_message(&mut rx).await.body()[..], b"{}");

        drop(handle);
        let _ = server.write_all(b"2\r\n[]\r\n0\r\n\r\n").await;
        drop(server);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn write_failure_ends_with_transport_error() {
        let (transport, _server) = MockTransport::pair();
        let connection = Connection::open("userstream.twitter.com", "127.0.0.1:443".parse().unwrap(), Box::new(transport.reject_writes())).await.unwrap();
        let (handle, mut rx) = start(HttpClient::new(connection));

        handle.request().unwrap();

        assert!(matches!(expect_end(&mut rx).await, StreamEnd::Transport(TransportError::Io { .. })));
        assert!(rx.recv().await.is_none());
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn request_after_engine_stopped_fails() {
        let (client, server) = client().await;
        let (handle, mut rx) = start(client);

        drop(server);
        assert!(expect_end(&mut rx).await.is_eof());
        assert!(rx.recv().await.is_none());

        assert!(matches!(handle.request(), Err(TransportError::NotConnected)));
    }
}
