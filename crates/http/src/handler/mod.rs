//! Response handler traits and utilities
//!
//! The client engine reports everything it reads through one [`Handler`]: each
//! complete response (or each chunk of a chunked response) as
//! [`Delivery::Message`], then exactly one [`Delivery::End`] when the stream stops,
//! unless the engine was cancelled first.
//!
//! [`make_handler`] turns an async closure into a handler.

use std::fmt::{Display, Formatter};
use std::{fmt, io};

use async_trait::async_trait;

use crate::protocol::{HttpError, ProtocolError, Response, TransportError};

/// Why a response stream stopped.
#[derive(Debug)]
pub enum StreamEnd {
    /// The peer closed the connection between two responses.
    Eof,
    Transport(TransportError),
    /// The bytes stopped being valid HTTP; nothing more is read after this.
    Protocol(ProtocolError),
}

impl StreamEnd {
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl Display for StreamEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => f.write_str("end of stream"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
        }
    }
}

impl From<HttpError> for StreamEnd {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Transport { source } => Self::Transport(source),
            HttpError::Protocol { source } => Self::Protocol(source),
            HttpError::Connection { source } => Self::Transport(TransportError::io(io::Error::other(source))),
        }
    }
}

#[derive(Debug)]
pub enum Delivery {
    Message(Response),
    End(StreamEnd),
}

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, delivery: Delivery);
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Delivery) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn call(&self, delivery: Delivery) {
        (self.f)(delivery).await;
    }
}

pub fn make_handler<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Delivery) -> Fut,
    Fut: Future<Output = ()>,
{
    HandlerFn { f }
}
