//! HTTP response decoder module
//!
//! Decodes a stream of responses arriving on one connection. It handles both
//! header parsing and body decoding through a small state machine and, once a
//! response is complete, goes back to waiting for the next status line on the
//! same stream.
//!
//! # Components
//!
//! - [`ResponseDecoder`]: Main decoder that coordinates header and payload parsing
//! - Header parsing: Uses [`HeaderDecoder`] for the status line and header block
//! - Payload handling: Uses [`PayloadDecoder`] for Content-Length or chunked bodies
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use circle_http::codec::ResponseDecoder;
//! use circle_http::protocol::{Message, PayloadItem};
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}"[..]);
//!
//! assert!(matches!(decoder.decode(&mut buffer), Ok(Some(Message::Header(_)))));
//! assert!(matches!(decoder.decode(&mut buffer), Ok(Some(Message::Payload(PayloadItem::Chunk(_))))));
//! assert!(matches!(decoder.decode(&mut buffer), Ok(Some(Message::Payload(PayloadItem::Eof)))));
//! ```

use crate::codec::body::PayloadDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{HttpError, Message, PayloadItem, ResponseHead, TransportError};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

/// A decoder for HTTP responses that handles both headers and payload
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: Waiting for a status line and header block
/// - `Some(PayloadDecoder)`: Reading the body of the current response
#[derive(Debug, Default)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true between responses, where a clean end of stream is allowed.
    pub fn at_message_boundary(&self) -> bool {
        self.payload_decoder.is_none()
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<ResponseHead>;
    type Error = HttpError;

    /// Attempts to decode the next frame from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Decoded a response head
    /// - `Ok(Some(Message::Payload(PayloadItem::Chunk(_))))`: Decoded a whole body or chunk
    /// - `Ok(Some(Message::Payload(PayloadItem::Eof)))`: The current response is complete
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a protocol error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
                Some(item @ PayloadItem::Eof) => {
                    trace!("response complete, awaiting next status line");
                    self.payload_decoder.take();
                    Some(Message::Payload(item))
                }
                None => None,
            };

            return Ok(message);
        }

        let message = match self.header_decoder.decode(src)? {
            Some((head, payload_size)) => {
                trace!(status = head.status().code(), ?payload_size, "decoded response head");
                self.payload_decoder = Some(payload_size.into());
                Some(Message::Header(head))
            }
            None => None,
        };

        Ok(message)
    }

    /// Called once the peer has closed the stream.
    ///
    /// Only a close between two responses is clean; anything else, including a
    /// half-received head, is reported as [`TransportError::UnexpectedEof`].
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() && self.at_message_boundary() => Ok(None),
            None => Err(TransportError::UnexpectedEof.into()),
        }
    }
}
