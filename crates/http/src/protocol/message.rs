use bytes::Bytes;

/// One frame produced by the response decoder.
///
/// A response on the wire becomes a `Header` frame followed by any number of
/// `Payload` frames, the last of which is always [`PayloadItem::Eof`].
#[derive(Debug)]
pub enum Message<T> {
    /// Status line and header block of a response
    Header(T),
    /// A complete body, a complete chunk, or the end of the current response
    Payload(PayloadItem),
}

/// Represents an item in the body of a response.
///
/// Unlike a byte stream, every `Chunk` is a logically complete unit: the whole
/// `Content-Length` body, or one whole chunk of a chunked body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    /// A complete unit of body data
    Chunk(Bytes),
    /// Marks the end of the current response; the next frame is a new header
    Eof,
}

/// How the body following a header block is framed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Body with known length in bytes, zero when `Content-Length` is absent
    Length(u64),
    /// Body using chunked transfer encoding
    Chunked,
}

impl PayloadSize {
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, PayloadSize::Chunked)
    }
}

impl<T> Message<T> {
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Message::Payload(_))
    }

    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Message::Header(_))
    }

    /// Converts the message into a PayloadItem if it contains payload data
    pub fn into_payload_item(self) -> Option<PayloadItem> {
        match self {
            Message::Header(_) => None,
            Message::Payload(payload_item) => Some(payload_item),
        }
    }
}

impl PayloadItem {
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }

    #[inline]
    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }

    /// Returns a reference to the contained bytes if this is a Chunk
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }

    /// Consumes the PayloadItem and returns the contained bytes if this is a Chunk
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }
}
