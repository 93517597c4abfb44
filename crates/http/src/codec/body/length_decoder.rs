//! Decoder implementation for responses delimited by a Content-Length header.
//!
//! See [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).
//! The whole body is delivered as a single item, so nothing is released until all
//! of it has been buffered.

use crate::protocol::{HttpError, PayloadItem, ProtocolError};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// Upper bound for growing the buffer ahead of the body; it still grows as bytes arrive.
const MAX_RESERVE: usize = 64 * 1024;

/// A decoder for a body with a known length.
///
/// Yields exactly one [`PayloadItem::Chunk`] holding the full body (empty when the
/// length is zero) followed by [`PayloadItem::Eof`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The total number of body bytes
    length: u64,
    finished: bool,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The body length taken from the Content-Length header
    pub fn new(length: u64) -> Self {
        Self { length, finished: false }
    }
}

impl Decoder for LengthDecoder {
    type Item = PayloadItem;
    type Error = HttpError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.finished {
            return Ok(Some(PayloadItem::Eof));
        }

        let length = usize::try_from(self.length)
            .map_err(|e| ProtocolError::invalid_content_length(format!("length {}: {e}", self.length)))?;

        if src.len() < length {
            src.reserve((length - src.len()).min(MAX_RESERVE));
            return Ok(None);
        }

        self.finished = true;
        Ok(Some(PayloadItem::Chunk(src.split_to(length).freeze())))
    }
}
