//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module decodes response bodies that use chunked transfer encoding
//! as specified in [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1).
//!
//! Every non-empty chunk is released only once its data and the trailing CRLF are
//! buffered, because a streaming server sends one logical message per chunk.

use crate::protocol::{HttpError, PayloadItem, ProtocolError};
use ChunkedState::*;
use bytes::{Buf, Bytes, BytesMut};
use std::task::Poll;
use tokio_util::codec::Decoder;
use tracing::trace;

/// Upper bound for growing the buffer ahead of a chunk's bytes; it still grows as they arrive.
const MAX_RESERVE: usize = 64 * 1024;

/// A decoder for handling HTTP chunked transfer encoding.
///
/// The decoder processes incoming bytes according to the chunked format:
/// - Each chunk starts with its size in hexadecimal
/// - Followed by optional extensions and CRLF
/// - Then the chunk data and CRLF
/// - A zero-sized chunk, optional trailers and an empty line end the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    remaining_size: u64,
    chunk: Option<Bytes>,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self { state: SizeStart, remaining_size: 0, chunk: None }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the first hex digit of the chunk size
    SizeStart,
    /// Read the remaining hex digits of the chunk size
    Size,
    /// Handle whitespace after size
    SizeLws,
    /// Skip chunk extensions
    Extension,
    /// Read LF after chunk size
    SizeLf,
    /// Wait for the whole chunk data
    Body,
    /// Read CR after chunk data
    BodyCr,
    /// Read LF after chunk data
    BodyLf,
    /// Read optional trailer fields
    Trailer,
    /// Read LF after trailer
    TrailerLf,
    /// Read final CR
    EndCr,
    /// Read final LF
    EndLf,
    /// Final state after reading last chunk
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = HttpError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when a whole chunk has been read
    /// - `Ok(Some(PayloadItem::Eof))` once the last chunk and trailers are consumed
    /// - `Ok(None)` when more data is needed
    /// - `Err(HttpError::Protocol)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.state == End {
                trace!("finished reading chunked data");
                return Ok(Some(PayloadItem::Eof));
            }

            if src.is_empty() {
                // need more data
                return Ok(None);
            }

            let previous = self.state;
            self.state = match self.state.step(src, &mut self.remaining_size, &mut self.chunk) {
                Poll::Pending => return Ok(None),
                Poll::Ready(Ok(new_state)) => new_state,
                Poll::Ready(Err(e)) => return Err(e.into()),
            };

            if previous == BodyLf
                && let Some(bytes) = self.chunk.take()
            {
                trace!(len = bytes.len(), "read chunk");
                return Ok(Some(PayloadItem::Chunk(bytes)));
            }
        }
    }
}

macro_rules! try_next_byte {
    ($src:ident) => {{
        if !$src.is_empty() {
            $src.get_u8()
        } else {
            return Poll::Pending;
        }
    }};
}

impl ChunkedState {
    /// Processes the next step in the chunked decoding state machine.
    ///
    /// # Arguments
    /// * `src` - Source buffer containing the chunked data
    /// * `remaining_size` - Size of the chunk currently being read
    /// * `chunk` - Slot holding the chunk data until its CRLF is validated
    fn step(&self, src: &mut BytesMut, remaining_size: &mut u64, chunk: &mut Option<Bytes>) -> Poll<Result<ChunkedState, ProtocolError>> {
        match self {
            SizeStart => ChunkedState::read_size_start(src, remaining_size),
            Size => ChunkedState::read_size(src, remaining_size),
            SizeLws => ChunkedState::read_size_lws(src),
            Extension => ChunkedState::read_extension(src),
            SizeLf => ChunkedState::read_size_lf(src, *remaining_size),
            Body => ChunkedState::read_body(src, remaining_size, chunk),
            BodyCr => ChunkedState::read_body_cr(src),
            BodyLf => ChunkedState::read_body_lf(src),
            Trailer => ChunkedState::read_trailer(src),
            TrailerLf => ChunkedState::read_trailer_lf(src),
            EndCr => ChunkedState::read_end_cr(src),
            EndLf => ChunkedState::read_end_lf(src),
            End => Poll::Ready(Ok(End)),
        }
    }

    /// Reads the first digit of a size line; a line without any hex digit is rejected.
    fn read_size_start(src: &mut BytesMut, size_per_chunk: &mut u64) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b if b.is_ascii_hexdigit() => Poll::Ready(push_hex_digit(size_per_chunk, b).map(|()| Size)),
            b'\t' | b' ' | b';' | b'\r' => Poll::Ready(Err(ProtocolError::invalid_chunk("missing chunk size"))),
            b => Poll::Ready(Err(ProtocolError::invalid_chunk(format!("invalid chunk size byte {b:#04x}")))),
        }
    }

    /// Reads and parses the chunk size in hexadecimal format, one digit at a time.
    ///
    /// # State Transitions
    /// - On hex digit (0-9, a-f, A-F): Stay in Size state to read more digits
    /// - On whitespace (tab/space): Transition to SizeLws state
    /// - On semicolon: Transition to Extension state to handle chunk extensions
    /// - On CR: Transition to SizeLf state to finish size line
    /// - On invalid character: Return error
    fn read_size(src: &mut BytesMut, size_per_chunk: &mut u64) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b if b.is_ascii_hexdigit() => Poll::Ready(push_hex_digit(size_per_chunk, b).map(|()| Size)),
            b'\t' | b' ' => Poll::Ready(Ok(SizeLws)),
            b';' => Poll::Ready(Ok(Extension)),
            b'\r' => Poll::Ready(Ok(SizeLf)),
            b => Poll::Ready(Err(ProtocolError::invalid_chunk(format!("invalid chunk size byte {b:#04x}")))),
        }
    }

    /// Processes linear whitespace after the chunk size; no more digits may follow.
    fn read_size_lws(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\t' | b' ' => Poll::Ready(Ok(SizeLws)),
            b';' => Poll::Ready(Ok(Extension)),
            b'\r' => Poll::Ready(Ok(SizeLf)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid chunk size linear white space"))),
        }
    }

    /// Skips chunk extensions up to the CR of the size line.
    ///
    /// Extensions containing a bare LF are rejected.
    fn read_extension(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(SizeLf)),
            b'\n' => Poll::Ready(Err(ProtocolError::invalid_chunk("chunk extension contains newline"))),
            _ => Poll::Ready(Ok(Extension)),
        }
    }

    /// Validates the LF closing the size line and picks body or trailer next.
    fn read_size_lf(src: &mut BytesMut, size_per_chunk: u64) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\n' if size_per_chunk == 0 => Poll::Ready(Ok(EndCr)),
            b'\n' => Poll::Ready(Ok(Body)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid chunk size LF"))),
        }
    }

    /// Takes the chunk data once all of it is buffered.
    ///
    /// Nothing is consumed until `size_per_chunk` bytes are available, so a chunk
    /// is never split across two deliveries.
    fn read_body(src: &mut BytesMut, size_per_chunk: &mut u64, chunk: &mut Option<Bytes>) -> Poll<Result<ChunkedState, ProtocolError>> {
        let Ok(size) = usize::try_from(*size_per_chunk) else {
            return Poll::Ready(Err(ProtocolError::invalid_chunk(format!("chunk size {size_per_chunk} too large"))));
        };

        if src.len() < size {
            src.reserve((size - src.len()).min(MAX_RESERVE));
            return Poll::Pending;
        }

        *chunk = Some(src.split_to(size).freeze());
        *size_per_chunk = 0;
        Poll::Ready(Ok(BodyCr))
    }

    fn read_body_cr(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(BodyLf)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid chunk body CR"))),
        }
    }

    fn read_body_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(SizeStart)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid chunk body LF"))),
        }
    }

    /// Reads but ignores a trailer field.
    fn read_trailer(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(TrailerLf)),
            _ => Poll::Ready(Ok(Trailer)),
        }
    }

    fn read_trailer_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(EndCr)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid trailer end LF"))),
        }
    }

    /// Either the CR of the empty line ending the body, or the start of a trailer.
    fn read_end_cr(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(EndLf)),
            _ => Poll::Ready(Ok(Trailer)),
        }
    }

    fn read_end_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, ProtocolError>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(End)),
            _ => Poll::Ready(Err(ProtocolError::invalid_chunk("invalid chunk end LF"))),
        }
    }
}

fn push_hex_digit(size_per_chunk: &mut u64, byte: u8) -> Result<(), ProtocolError> {
    let digit = match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte + 10 - b'a',
        _ => byte + 10 - b'A',
    };

    *size_per_chunk = size_per_chunk
        .checked_mul(16)
        .and_then(|size| size.checked_add(u64::from(digit)))
        .ok_or_else(|| ProtocolError::invalid_chunk("chunk size overflow"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut buffer: BytesMut = BytesMut::from(&b"10\r\n1234567890abcdef\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(item.is_chunk());
        assert_eq!(item.as_bytes().unwrap().len(), 16);
        assert_eq!(&item.as_bytes().unwrap()[..], b"1234567890abcdef");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_chunks() {
        let mut buffer: BytesMut = BytesMut::from(&b"5\r\nhello\r\n7\r\n, world\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b", world"));

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_chunks_with_extensions() {
        let mut buffer: BytesMut = BytesMut::from(&b"5;chunk-ext=value\r\nhello\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_chunks_with_trailers() {
        let mut buffer: BytesMut = BytesMut::from(&b"5\r\nhello\r\n0\r\nTrailer: value\r\n\r\nHTTP/1.1"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
        assert_eq!(&buffer[..], b"HTTP/1.1");
    }

    #[test]
    fn test_incomplete_chunk_waits_for_whole_chunk() {
        let mut buffer: BytesMut = BytesMut::from(&b"5\r\nhel"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"hel");

        buffer.extend_from_slice(b"lo\r");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\n0\r\n\r\n");
        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_size_line_split_across_reads() {
        let mut buffer: BytesMut = BytesMut::from(&b"1"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        buffer.extend_from_slice(b"a\r\n");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(&[b'x'; 26]);
        buffer.extend_from_slice(b"\r\n");
        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap().len(), 26);
    }

    #[test]
    fn test_invalid_chunk_size() {
        let mut buffer: BytesMut = BytesMut::from(&b"xyz\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let result = decoder.decode(&mut buffer);
        assert!(matches!(result, Err(HttpError::Protocol { source: ProtocolError::InvalidChunk { .. } })));
    }

    #[test]
    fn test_size_line_without_digits() {
        for line in [&b"\r\n\r\n"[..], &b";ext\r\n\r\n"[..], &b" 5\r\nhello\r\n"[..]] {
            let mut buffer = BytesMut::from(line);
            let mut decoder = ChunkedDecoder::new();

            let result = decoder.decode(&mut buffer);
            assert!(matches!(result, Err(HttpError::Protocol { source: ProtocolError::InvalidChunk { .. } })), "{line:?}");
        }
    }

    #[test]
    fn test_size_line_without_digits_after_chunk() {
        let mut buffer: BytesMut = BytesMut::from(&b"5\r\nhello\r\n\r\n\r\nHTTP/1.1 200 OK\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));

        assert!(decoder.decode(&mut buffer).is_err());
    }

    #[test]
    fn test_chunk_size_overflow() {
        let mut buffer: BytesMut = BytesMut::from(&b"fffffffffffffffff\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert!(decoder.decode(&mut buffer).is_err());
    }

    #[test]
    fn test_missing_crlf() {
        let mut buffer: BytesMut = BytesMut::from(&b"5\r\nhelloBad"[..]);
        let mut decoder = ChunkedDecoder::new();

        let result = decoder.decode(&mut buffer);
        assert!(result.is_err());
    }

    #[test]
    fn test_large_chunk() {
        let size = 1024 * 1024;
        let mut data = Vec::with_capacity(size + 16);
        data.extend(format!("{size:x}\r\n").into_bytes());
        data.extend(vec![b'A'; size]);
        data.extend(b"\r\n0\r\n\r\n");

        let mut buffer = BytesMut::from(&data[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap().len(), size);
        assert!(chunk.as_bytes().unwrap().iter().all(|&b| b == b'A'));

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_zero_size_chunk() {
        let mut buffer: BytesMut = BytesMut::from(&b"0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }
}
