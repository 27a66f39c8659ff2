//! # Probe Outcomes
//!
//! The terminal result of probing one host. A received response is always a
//! [`Classification::StatusCode`], whatever the code; only transport failures
//! map to the two error kinds.

use std::fmt;

use crate::network::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A response was received with this HTTP status code.
    StatusCode(u16),
    /// DNS failure, refused connection, TLS or protocol error.
    ConnectionError,
    /// No response arrived within the attempt deadline.
    Timeout,
}

impl Classification {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Classification::StatusCode(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::StatusCode(code) => write!(f, "{code}"),
            Classification::ConnectionError => f.write_str("Connection Error"),
            Classification::Timeout => f.write_str("Timeout"),
        }
    }
}

/// One host paired with its final classification. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    host: Host,
    classification: Classification,
}

impl Outcome {
    pub fn new(host: Host, classification: Classification) -> Self {
        Self {
            host,
            classification,
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }
}
