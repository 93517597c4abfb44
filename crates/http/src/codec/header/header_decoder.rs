//! HTTP response header decoder
//!
//! Parses the status line and header block of a response from raw bytes and
//! decides how the body that follows is framed.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1 status lines are accepted
//!
//! # Implementation Details
//!
//! 1. Wait until `httparse` reports a complete head (the `\r\n\r\n` terminator)
//! 2. Copy the status and each `name: value` pair into a [`HeaderMap`], so a
//!    duplicate name keeps its last value
//! 3. Split the head off the source buffer, leaving any body bytes in place
//! 4. Pick the body framing from `Transfer-Encoding` and `Content-Length`

use bytes::{Buf, BytesMut};
use http::Version;
use httparse::{Error, Status as ParseStatus};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{HeaderMap, HttpError, PayloadSize, ProtocolError, ResponseHead, Status};

/// Maximum number of headers allowed in a response
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the status line plus header block
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for response heads implementing the [`Decoder`] trait.
#[derive(Debug, Default)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (ResponseHead, PayloadSize);
    type Error = HttpError;

    /// Attempts to decode a response head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` if a complete head was parsed and consumed
    /// - `Ok(None)` if more data is needed
    /// - `Err(HttpError::Protocol)` if the status line or a header line is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut res = httparse::Response::new(&mut headers);

        let parsed_result = res.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ProtocolError::too_many_headers(MAX_HEADER_NUM),
            e @ (Error::Status | Error::Version) => ProtocolError::invalid_status_line(e),
            e => ProtocolError::invalid_header(e),
        });

        match parsed_result? {
            ParseStatus::Complete(body_offset) => {
                trace!(head_size = body_offset, "parsed response head");
                ensure!(body_offset <= MAX_HEADER_BYTES, ProtocolError::too_large_header(body_offset, MAX_HEADER_BYTES).into());

                let version = match res.version {
                    Some(0) => Version::HTTP_10,
                    Some(1) => Version::HTTP_11,
                    v => return Err(ProtocolError::invalid_status_line(format!("unsupported version {v:?}")).into()),
                };
                let code = res.code.ok_or_else(|| ProtocolError::invalid_status_line("missing status code"))?;
                let status = Status::new(code, res.reason.unwrap_or_default());

                let header_map: HeaderMap = res
                    .headers
                    .iter()
                    .map(|header| (header.name, String::from_utf8_lossy(header.value).into_owned()))
                    .collect();

                let head = ResponseHead::new(version, status, header_map);
                let payload_size = parse_payload(&head)?;

                src.advance(body_offset);
                Ok(Some((head, payload_size)))
            }
            // If parsing incomplete, ensure current buffer size does not exceed limit
            ParseStatus::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ProtocolError::too_large_header(src.len(), MAX_HEADER_BYTES).into());
                Ok(None)
            }
        }
    }
}

/// Determines how the body following `head` is framed.
///
/// Chunked when the last transfer coding is `chunked`; otherwise exactly
/// `Content-Length` bytes, zero when the header is absent.
fn parse_payload(head: &ResponseHead) -> Result<PayloadSize, ProtocolError> {
    if is_chunked(head.headers().get_ignore_case("Transfer-Encoding")) {
        return Ok(PayloadSize::Chunked);
    }

    match head.headers().get_ignore_case("Content-Length") {
        None => Ok(PayloadSize::Length(0)),
        Some(cl_str) => {
            let length = cl_str
                .trim()
                .parse::<u64>()
                .map_err(|e| ProtocolError::invalid_content_length(format!("value {cl_str}: {e}")))?;
            Ok(PayloadSize::Length(length))
        }
    }
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&str>) -> bool {
    header_value
        .and_then(|value| value.rsplit(',').next())
        .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}
