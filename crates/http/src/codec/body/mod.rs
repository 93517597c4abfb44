//! Response body decoding.
//!
//! # Components
//!
//! - `ChunkedDecoder`: Handles chunked transfer encoded bodies, one item per chunk
//! - `LengthDecoder`: Processes Content-Length delimited bodies as a single item
//! - [`PayloadDecoder`]: Main decoder that picks one of the two strategies
//!
//! Both strategies only release complete units, which is what lets the client
//! treat every item as one logical message.

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
