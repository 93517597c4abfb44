//! HTTP request head encoder
//!
//! Serializes the request line and header block:
//!
//! ```text
//! <METHOD> <path>[?<query>] HTTP/1.1\r\n
//! Host: <host>\r\n
//! <name>: <value>\r\n ...
//! [Content-Length: <n>\r\n]
//! \r\n
//! ```

use crate::protocol::Request;

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for request heads implementing the [`Encoder`] trait.
///
/// Caller-supplied header values, including an OAuth `Authorization` header, are
/// written verbatim.
#[derive(Debug, Default)]
pub struct HeaderEncoder;

impl Encoder<&Request> for HeaderEncoder {
    type Error = io::Error;

    fn encode(&mut self, request: &Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        write!(FastWrite(dst), "{} {} HTTP/1.1\r\nHost: {}\r\n", request.method(), request.target().path_and_query(), request.host())?;

        for (header_name, header_value) in request.target().headers.iter() {
            dst.put_slice(header_name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_bytes());
            dst.put_slice(b"\r\n");
        }

        if !request.body().is_empty() {
            write!(FastWrite(dst), "Content-Length: {}\r\n", request.body().len())?;
        }

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the buffer that was reserved above.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
