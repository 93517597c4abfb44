//! An asynchronous streaming HTTP/1.1 client
//!
//! This crate provides the networking half of a console client for a streaming
//! JSON web API: it connects over plain TCP or TLS, writes requests whose query and
//! headers (OAuth included) are prepared by the caller, and decodes a never-ending
//! sequence of responses from the same connection, handing every complete body or
//! chunk to a handler as it arrives.
//!
//! # Features
//!
//! - Asynchronous I/O using tokio
//! - TLS through rustls with the webpki root set
//! - `Content-Length` and chunked transfer decoding
//! - Keep-alive: many responses per connection
//! - Requests may be queued while a streaming response is still being read
//! - Cancellation without any further handler invocation
//!
//! # Example
//!
//! ```no_run
//! use circle_http::client::HttpClient;
//! use circle_http::connection::{Connection, Endpoint, TlsContext};
//! use circle_http::handler::{Delivery, make_handler};
//! use tracing::{error, info};
//!
//! #[tokio::main]
//! async fn main() {
//!     let endpoint = Endpoint::https("userstream.twitter.com");
//!     let connection = match Connection::establish(&endpoint, Some(&TlsContext::webpki())).await {
//!         Ok(connection) => connection,
//!         Err(e) => {
//!             error!(cause = %e, "can't connect");
//!             return;
//!         }
//!     };
//!
//!     let handler = make_handler(|delivery| async move {
//!         match delivery {
//!             Delivery::Message(response) => info!(len = response.body().len(), "message"),
//!             Delivery::End(end) => info!(%end, "stream ended"),
//!         }
//!     });
//!
//!     let handle = HttpClient::new(connection).path("/2/user.json").header("Authorization", "OAuth ...").start(handler);
//!     if let Err(e) = handle.request() {
//!         error!(cause = %e, "can't send request");
//!     }
//!     handle.join().await;
//! }
//! ```
//!
//! # Architecture
//!
//! - [`transport`]: plain and TLS byte streams behind one trait
//! - [`connection`]: resolving, connecting and handshaking
//! - [`codec`]: request encoding and response decoding
//! - [`client`]: the engine task and its handle
//! - [`handler`]: how responses and the end of the stream are delivered
//! - [`protocol`]: request, response, header and error types
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64
//! - No redirects, proxies or compression

pub mod client;
pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod transport;

mod utils;
pub(crate) use utils::ensure;
