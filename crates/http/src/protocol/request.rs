//! Outgoing request representation.
//!
//! The query string and header values are opaque text here: an OAuth signer or
//! any other collaborator produces them and the client writes them verbatim.

use bytes::Bytes;
use http::Method;

use crate::protocol::HeaderMap;

/// The per-request fields a client can change between requests on one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
}

impl RequestTarget {
    pub fn new<P: Into<String>>(path: P) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// The request-target as written in the request line: `path[?query]`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() { self.path.clone() } else { format!("{}?{}", self.path, self.query) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    host: String,
    target: RequestTarget,
    body: Bytes,
}

impl Request {
    pub fn new<H: Into<String>>(host: H, target: RequestTarget, body: Bytes) -> Self {
        Self { host: host.into(), target, body }
    }

    /// `POST` when there is a body to send, `GET` otherwise.
    pub fn method(&self) -> Method {
        if self.body.is_empty() { Method::GET } else { Method::POST }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_follows_body() {
        let get = Request::new("api.twitter.com", RequestTarget::new("/1/x.json"), Bytes::new());
        assert_eq!(get.method(), Method::GET);

        let post = Request::new("api.twitter.com", RequestTarget::new("/1/x.json"), Bytes::from_static(b"status=hi"));
        assert_eq!(post.method(), Method::POST);
    }

    #[test]
    fn query_is_optional() {
        let mut target = RequestTarget::new("/1/x.json");
        assert_eq!(target.path_and_query(), "/1/x.json");

        target.query = "q=1".to_string();
        assert_eq!(target.path_and_query(), "/1/x.json?q=1");
    }
}
