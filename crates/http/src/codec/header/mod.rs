//! HTTP header processing for the client side
//!
//! - [`HeaderDecoder`]: Decodes a response status line and header block
//!   - Supports standard HTTP/1.1 header format
//!   - Keeps header names as received, last duplicate wins
//!   - Manages header size limits
//!   - Selects content-length or chunked body framing
//!
//! - [`HeaderEncoder`]: Encodes the request line and header block
//!   - Adds `Host` and, for requests with a body, `Content-Length`

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
