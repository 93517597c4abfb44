use rustls::{ClientConfig, RootCertStore};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// A host name plus port, resolved at [`Connection::establish`](crate::connection::Connection::establish) time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn http<H: Into<String>>(host: H) -> Self {
        Self::new(host, HTTP_PORT)
    }

    pub fn https<H: Into<String>>(host: H) -> Self {
        Self::new(host, HTTPS_PORT)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Shared TLS client configuration, cheap to clone.
#[derive(Debug, Clone)]
pub struct TlsContext {
    config: Arc<ClientConfig>,
}

impl TlsContext {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Verifies servers against the Mozilla root set bundled in `webpki-roots`.
    pub fn webpki() -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder().with_root_certificates(roots).with_no_client_auth();
        Self::new(Arc::new(config))
    }

    pub fn config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }
}

impl From<Arc<ClientConfig>> for TlsContext {
    fn from(config: Arc<ClientConfig>) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ports() {
        let endpoint = Endpoint::https("userstream.twitter.com");
        assert_eq!(endpoint.port(), 443);
        assert_eq!(endpoint.to_string(), "userstream.twitter.com:443");

        assert_eq!(Endpoint::http("api.twitter.com").port(), 80);
    }
}
