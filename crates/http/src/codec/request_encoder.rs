use crate::codec::header::HeaderEncoder;
use crate::protocol::Request;
use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::Encoder;
use tracing::trace;

/// Encodes a whole [`Request`], head and body, into one buffer so the client can
/// hand it to the transport as a single write.
#[derive(Debug, Default)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<Request> for RequestEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(&item, dst)?;
        dst.put_slice(item.body());
        trace!(method = %item.method(), target = %item.target().path_and_query(), len = dst.len(), "encoded request");
        Ok(())
    }
}
