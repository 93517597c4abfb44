//! Core HTTP protocol types for the streaming client.
//!
//! # Architecture
//!
//! - **Message Handling** ([`message`]): frames produced by the response decoder
//!   - [`Message`]: Represents either a response head or a payload item
//!   - [`PayloadItem`]: A complete body/chunk, or the end of a response
//!   - [`PayloadSize`]: How the body following a head is framed
//!
//! - **Requests** ([`request`]): [`Request`] and the mutable [`RequestTarget`]
//!
//! - **Responses** ([`response`]): [`Status`], [`ResponseHead`] and [`Response`]
//!
//! - **Headers** ([`header`]): case-preserving, last-wins [`HeaderMap`]
//!
//! - **Parameters**: [`split_params`] for `key=value&...` bodies
//!
//! - **Error Handling** ([`error`]): one type per failure class
//!   - [`ConnectionError`]: resolve/connect/handshake failures
//!   - [`TransportError`]: read/write failures and premature EOF
//!   - [`ProtocolError`]: malformed status line, header or chunk framing
//!   - [`HttpError`]: umbrella type used by the codecs

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod header;
pub use header::HeaderMap;

mod request;
pub use request::Request;
pub use request::RequestTarget;

mod response;
pub use response::Response;
pub use response::ResponseHead;
pub use response::Status;

mod params;
pub use params::split_params;

mod error;
pub use error::ConnectionError;
pub use error::HttpError;
pub use error::ProtocolError;
pub use error::TransportError;
