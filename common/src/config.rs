use std::time::Duration;

use thiserror::Error;

use crate::network::Method;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_CONCURRENCY: usize = 100;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Output preferences for the terminal front end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub no_banner: bool,
    /// `0` prints everything, `1` drops banner and headers, `2` only the results.
    pub quiet: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency ceiling must be at least 1")]
    ZeroConcurrency,
    #[error("at least one http attempt is required (retries must be >= 1)")]
    ZeroRetries,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Parameters of one probing batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub method: Method,
    /// Deadline of every single request attempt.
    pub timeout: Duration,
    /// Maximum number of hosts probed at the same time.
    pub concurrency: usize,
    /// Attempts on plain http before the https fallback.
    pub retries: u32,
    /// Pause between two http attempts.
    pub backoff: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            method: Method::Get,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
