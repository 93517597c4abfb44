//! The streaming HTTP/1.1 client
//!
//! [`HttpClient`] holds an established [`Connection`](crate::connection::Connection)
//! and the request target. [`HttpClient::start`] moves both into an engine task and
//! returns a [`ClientHandle`] to queue requests, adjust the target and stop it.
//!
//! # Delivery
//!
//! - A `Content-Length` response is delivered once, with its whole body
//! - A chunked response is delivered once per non-empty chunk, each time with the
//!   same head, which is how long-lived streaming endpoints send one record per chunk
//! - When the stream stops the handler sees exactly one end notification, unless the
//!   engine was aborted first

mod engine;
mod http_client;

pub use http_client::ClientHandle;
pub use http_client::DEFAULT_READ_BUFFER_SIZE;
pub use http_client::HttpClient;
