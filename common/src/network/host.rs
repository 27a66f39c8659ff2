//! # Probe Target Model
//!
//! A [`Host`] is whatever the enumeration step produced: a bare subdomain
//! (`api.example.com`) or a `host:port` pair. It is treated as an opaque
//! identifier; no normalization or deduplication happens here.

use std::fmt;
use std::str::FromStr;

use crate::network::request::Scheme;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Host(String);

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the request URL for this host under `scheme`.
    pub fn url(&self, scheme: Scheme) -> String {
        format!("{}://{}", scheme.as_str(), self.0)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Host {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Host {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for Host {
    type Err = String;

    /// Parses a single line of enumeration output.
    ///
    /// Surrounding whitespace is stripped; an empty line is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty host".to_string());
        }
        Ok(Self::new(trimmed))
    }
}
