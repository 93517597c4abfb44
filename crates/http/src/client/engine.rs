//! The task behind a [`ClientHandle`](crate::client::ClientHandle)
//!
//! One loop owns both halves of the connection. A queued request is written while
//! the read side keeps decoding, so a long-lived streaming response never blocks
//! later requests from going out. At most one write and one read are in flight.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{BoxFuture, OptionFuture};
use futures::{SinkExt, StreamExt};
use tokio::io::WriteHalf;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::connection::Connection;
use crate::handler::{Delivery, Handler, StreamEnd};
use crate::protocol::{Message, PayloadItem, ProtocolError, Request, ResponseHead, TransportError};

type Writer = FramedWrite<WriteHalf<Connection>, RequestEncoder>;
type PendingWrite = BoxFuture<'static, (Writer, io::Result<()>)>;

pub(crate) struct Engine<H> {
    pub(crate) handler: H,
    pub(crate) requests: UnboundedReceiver<Request>,
    pub(crate) cancel: CancellationToken,
    pub(crate) connected: Arc<AtomicBool>,
    pub(crate) read_buffer_size: usize,
}

impl<H: Handler> Engine<H> {
    pub(crate) async fn run(mut self, connection: Connection) {
        let host = connection.host().to_owned();
        let (reader, writer) = tokio::io::split(connection);
        let mut framed_read = FramedRead::with_capacity(reader, ResponseDecoder::new(), self.read_buffer_size);
        let mut writer: Option<Writer> = Some(FramedWrite::new(writer, RequestEncoder::new()));
        let mut pending_write: Option<PendingWrite> = None;
        let mut accepting = true;
        let mut head: Option<ResponseHead> = None;

        let end = loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => {
                    debug!(%host, "engine cancelled");
                    self.connected.store(false, Ordering::Release);
                    return;
                }

                Some((returned, result)) = OptionFuture::from(pending_write.as_mut()), if pending_write.is_some() => {
                    pending_write = None;
                    if let Err(e) = result {
                        break StreamEnd::Transport(TransportError::io(e));
                    }
                    trace!(%host, "request written");
                    writer = Some(returned);
                }

                request = self.requests.recv(), if accepting && pending_write.is_none() => {
                    let Some(request) = request else {
                        accepting = false;
                        continue;
                    };
                    let Some(mut framed_write) = writer.take() else {
                        continue;
                    };
                    debug!(%host, method = %request.method(), target = %request.target().path_and_query(), "sending request");
                    pending_write = Some(Box::pin(async move {
                        let result = framed_write.send(request).await;
                        (framed_write, result)
                    }));
                }

                frame = framed_read.next() => match frame {
                    Some(Ok(Message::Header(response_head))) => {
                        trace!(%host, status = response_head.status().code(), "response head");
                        head = Some(response_head);
                    }
                    Some(Ok(Message::Payload(PayloadItem::Chunk(body)))) => {
                        let Some(response_head) = head.as_ref() else {
                            break StreamEnd::Protocol(ProtocolError::invalid_header("body without response head"));
                        };
                        if self.cancel.is_cancelled() {
                            return;
                        }
                        self.handler.call(Delivery::Message(response_head.clone().body(body))).await;
                    }
                    Some(Ok(Message::Payload(PayloadItem::Eof))) => {
                        head = None;
                    }
                    Some(Err(e)) => break StreamEnd::from(e),
                    None => break StreamEnd::Eof,
                },
            }
        };

        self.connected.store(false, Ordering::Release);
        if self.cancel.is_cancelled() {
            return;
        }

        info!(%host, reason = %end, "response stream ended");
        self.handler.call(Delivery::End(end)).await;
    }
}
