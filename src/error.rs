//! Error types for certificate evaluation and notification delivery.
//!
//! Per-host failures are carried as [`HostEvaluationError`] inside an
//! `Errored` evaluation result; their `Display` text is what ends up in the
//! error digest. Chat delivery failures are [`DeliveryError`]s, which the
//! dispatcher logs and swallows.

use std::fmt;
use std::io;

/// Error produced while evaluating a single host or special entry.
#[derive(Debug)]
pub enum HostEvaluationError {
    /// DNS resolution failed for the given hostname
    DnsResolution {
        /// The hostname that failed to resolve
        hostname: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TCP connection failed to the target address
    ConnectionFailed {
        /// The address (host:port) that connection failed to
        address: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TLS handshake failed
    HandshakeFailed {
        /// Details about why the handshake failed
        details: String,
    },

    /// Network operation timeout
    Timeout {
        /// Description of which operation timed out
        operation: String,
    },

    /// The peer certificate carries no "not valid after" field
    MissingExpiry,

    /// The "not valid after" field could not be parsed
    InvalidExpiry {
        /// The raw field value
        value: String,
    },

    /// A manually tracked expiry date is not in day-month-year form
    InvalidDate {
        /// The raw configured value
        value: String,
    },

    /// OpenSSL error occurred
    OpenSSLError {
        /// The underlying OpenSSL error
        details: String,
    },

    /// Generic I/O error
    IoError {
        /// The underlying I/O error
        source: io::Error,
    },
}

impl fmt::Display for HostEvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DnsResolution { hostname, source } => {
                write!(f, "Failed to resolve hostname {}: {}", hostname, source)
            }
            Self::ConnectionFailed { address, source } => {
                write!(f, "Connection failed to {}: {}", address, source)
            }
            Self::HandshakeFailed { details } => {
                write!(f, "TLS handshake failed: {}", details)
            }
            Self::Timeout { operation } => {
                write!(f, "Operation timed out: {}", operation)
            }
            Self::MissingExpiry => write!(f, "missing expiry field"),
            Self::InvalidExpiry { value } => {
                write!(f, "Unparsable certificate expiry: {}", value)
            }
            Self::InvalidDate { value } => {
                write!(f, "Invalid expiry date '{}', expected DD-MM-YYYY", value)
            }
            Self::OpenSSLError { details } => {
                write!(f, "OpenSSL error: {}", details)
            }
            Self::IoError { source } => {
                write!(f, "I/O error: {}", source)
            }
        }
    }
}

impl std::error::Error for HostEvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DnsResolution { source, .. } => Some(source),
            Self::ConnectionFailed { source, .. } => Some(source),
            Self::IoError { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for HostEvaluationError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout {
                operation: e.to_string(),
            },
            _ => Self::IoError { source: e },
        }
    }
}

impl From<openssl::error::ErrorStack> for HostEvaluationError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::OpenSSLError {
            details: e.to_string(),
        }
    }
}

impl<S: fmt::Debug> From<openssl::ssl::HandshakeError<S>> for HostEvaluationError {
    fn from(e: openssl::ssl::HandshakeError<S>) -> Self {
        Self::HandshakeFailed {
            details: format!("{}", e),
        }
    }
}

/// Error returned by a [`Notifier`](crate::notify::Notifier) when a message
/// could not be delivered.
#[derive(Debug)]
pub enum DeliveryError {
    /// Transport level failure (connect, timeout, body decoding)
    Http(reqwest::Error),
    /// The chat API answered with a non-success HTTP status
    Status {
        /// HTTP status code
        code: u16,
        /// Response body, as far as it could be read
        body: String,
    },
    /// The chat API accepted the request but reported an error
    Api(String),
    /// The API endpoint could not be derived from the configured base URL
    InvalidEndpoint(url::ParseError),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {}", e),
            Self::Status { code, body } => {
                write!(f, "chat API returned status {}: {}", code, body)
            }
            Self::Api(error) => write!(f, "{}", error),
            Self::InvalidEndpoint(e) => write!(f, "invalid chat API endpoint: {}", e),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::InvalidEndpoint(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<url::ParseError> for DeliveryError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidEndpoint(e)
    }
}
