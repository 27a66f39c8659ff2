use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::network::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request methods a probe may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    /// Accepts `GET`, `POST` or `HEAD` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "HEAD" => Ok(Method::Head),
            _ => Err(format!("unsupported request type: {s} (expected GET, POST or HEAD)")),
        }
    }
}

/// A single request to issue. Built per attempt and dropped once classified.
#[derive(Debug, Clone)]
pub struct ProbeAttempt<'a> {
    pub host: &'a Host,
    pub scheme: Scheme,
    pub method: Method,
    pub timeout: Duration,
}

impl ProbeAttempt<'_> {
    pub fn url(&self) -> String {
        self.host.url(self.scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Get));
        assert_eq!("Post".parse::<Method>(), Ok(Method::Post));
        assert_eq!("HEAD".parse::<Method>(), Ok(Method::Head));
        assert!("PUT".parse::<Method>().is_err());
    }

    #[test]
    fn attempt_url_uses_its_scheme() {
        let host = Host::new("b.example.com");
        let attempt = ProbeAttempt {
            host: &host,
            scheme: Scheme::Https,
            method: Method::Head,
            timeout: Duration::from_secs(1),
        };
        assert_eq!(attempt.url(), "https://b.example.com");
    }
}
