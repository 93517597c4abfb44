//! HTTP response types handed to the [`Handler`](crate::handler::Handler).
//!
//! A [`ResponseHead`] is what the header decoder produces; a [`Response`] is a head
//! paired with one complete body. For chunked responses every chunk becomes its own
//! `Response` carrying a copy of the same head.

use bytes::Bytes;
use http::Version;

use crate::protocol::HeaderMap;

/// The status line of a response: numeric code and reason phrase as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: u16,
    reason: String,
}

impl Status {
    pub fn new<S: Into<String>>(code: u16, reason: S) -> Self {
        Self { code, reason: reason.into() }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    version: Version,
    status: Status,
    headers: HeaderMap,
}

impl ResponseHead {
    pub fn new(version: Version, status: Status, headers: HeaderMap) -> Self {
        Self { version, status, headers }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Attaches a body, producing a complete response.
    pub fn body(self, body: Bytes) -> Response {
        Response { head: self, body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    head: ResponseHead,
    body: Bytes,
}

impl Response {
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    pub fn status(&self) -> &Status {
        self.head.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.head.headers()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (ResponseHead, Bytes) {
        (self.head, self.body)
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}
