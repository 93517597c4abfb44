//! HTTP codec module for encoding requests and decoding responses
//!
//! This module provides the framing used by the client: a streaming response
//! decoder built as a state machine over headers and payload, and a request
//! encoder that produces one buffered write per request.
//!
//! # Architecture
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: Decodes a sequence of responses from one stream
//!   - Header parsing via the `header` module
//!   - Payload decoding via the `body` module
//!
//! - Request handling:
//!   - [`RequestEncoder`]: Encodes outgoing requests
//!
//! # Features
//!
//! - Support for chunked transfer encoding, one item per chunk
//! - Content-Length based payload handling
//! - Connection reuse: the decoder returns to the status line after every response

mod body;
mod header;
mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
