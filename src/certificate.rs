//! Peer certificate retrieval.
//!
//! [`OpensslSource`] opens a TCP connection, performs a verified TLS
//! handshake with the hostname as SNI and returns the leaf certificate's
//! "not valid after" field in OpenSSL's native text form. Anything that
//! needs certificates without a network (tests, dry runs) implements
//! [`CertificateSource`] instead.

use crate::error::HostEvaluationError;
use chrono::{NaiveDate, NaiveDateTime};
use openssl::ssl::{HandshakeError, SslConnector, SslMethod};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 443;
/// Used when no `TIMEOUT` setting is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything able to report the expiry field of a host's certificate.
pub trait CertificateSource {
    /// Returns the raw "not valid after" text of the certificate presented
    /// by `hostname`, or `None` when the peer did not present one.
    fn not_after(&self, hostname: &str) -> Result<Option<String>, HostEvaluationError>;
}

/// Live TLS source backed by OpenSSL and the system trust store.
pub struct OpensslSource {
    connector: SslConnector,
    port: u16,
    timeout: Duration,
}

impl OpensslSource {
    pub fn new(timeout: Duration) -> Result<Self, HostEvaluationError> {
        let connector = SslConnector::builder(SslMethod::tls())?.build();
        Ok(OpensslSource {
            connector,
            port: DEFAULT_PORT,
            timeout,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn connect(&self, hostname: &str) -> Result<TcpStream, HostEvaluationError> {
        let remote = format!("{}:{}", hostname, self.port);
        let addresses: Vec<_> = remote
            .to_socket_addrs()
            .map_err(|e| HostEvaluationError::DnsResolution {
                hostname: hostname.to_string(),
                source: e,
            })?
            .collect();

        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no addresses resolved");
        if addresses.is_empty() {
            return Err(HostEvaluationError::DnsResolution {
                hostname: hostname.to_string(),
                source: last_error,
            });
        }

        for socket_addr in addresses {
            match TcpStream::connect_timeout(&socket_addr, self.timeout) {
                Ok(tcp_stream) => return Ok(tcp_stream),
                Err(e) => last_error = e,
            }
        }

        if last_error.kind() == io::ErrorKind::TimedOut {
            return Err(HostEvaluationError::Timeout {
                operation: format!("connect to {}", remote),
            });
        }
        Err(HostEvaluationError::ConnectionFailed {
            address: remote,
            source: last_error,
        })
    }
}

impl CertificateSource for OpensslSource {
    fn not_after(&self, hostname: &str) -> Result<Option<String>, HostEvaluationError> {
        let tcp_stream = self.connect(hostname)?;
        tcp_stream.set_read_timeout(Some(self.timeout))?;
        tcp_stream.set_write_timeout(Some(self.timeout))?;

        let stream = self
            .connector
            .connect(hostname, tcp_stream)
            .map_err(|e| match e {
                // A blocking socket only reports WouldBlock once the read timeout expires.
                HandshakeError::WouldBlock(_) => HostEvaluationError::Timeout {
                    operation: format!("TLS handshake with {}", hostname),
                },
                e => e.into(),
            })?;
        Ok(stream
            .ssl()
            .peer_certificate()
            .map(|cert| cert.not_after().to_string()))
    }
}

/// Parses OpenSSL's `"MMM D HH:MM:SS YYYY GMT"` rendering of a certificate
/// time and keeps only the calendar date.
pub fn parse_not_after(value: &str) -> Result<NaiveDate, HostEvaluationError> {
    // OpenSSL pads single-digit days with a second space.
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, "%b %d %H:%M:%S %Y GMT")
        .map(|parsed| parsed.date())
        .map_err(|_| HostEvaluationError::InvalidExpiry {
            value: value.to_string(),
        })
}
