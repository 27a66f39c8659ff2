//! # Per-Host Retry Policy
//!
//! Resolves one host to a final [`Outcome`] by walking an explicit state
//! machine:
//!
//! ```text
//! HttpRetry(1) ──ConnectionError──▶ HttpRetry(2) ──▶ … ──▶ HttpRetry(max)
//!      │                                                      │
//!      │ status / timeout                     ConnectionError │
//!      ▼                                                      ▼
//!  Done(classification) ◀────────── any result ───────── HttpsFallback
//! ```
//!
//! A connection error is retried on http and then tried once over https. A
//! timeout ends the sequence immediately: the host answered too slowly, so
//! it is not re-probed on another scheme.

use std::sync::Arc;
use std::time::Duration;

use subprobe_common::config::ProbeConfig;
use subprobe_common::network::{Classification, Host, Method, Outcome, ProbeAttempt, Scheme};
use tracing::debug;

use crate::probe::Probe;
use crate::scanner::observer::BatchObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of http attempts before falling back to https. Always >= 1.
    pub max_retries: u32,
    /// Pause between two http attempts (not after the last one).
    pub backoff: Duration,
}

impl From<&ProbeConfig> for RetryPolicy {
    fn from(cfg: &ProbeConfig) -> Self {
        Self {
            max_retries: cfg.retries,
            backoff: cfg.backoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// The n-th attempt over plain http is due (1-based).
    HttpRetry(u32),
    /// http is exhausted; one https attempt is due.
    HttpsFallback,
    Done(Classification),
}

impl ProbeState {
    /// Transition after the attempt belonging to `self` returned `result`.
    pub fn advance(self, result: Classification, max_retries: u32) -> ProbeState {
        match (self, result) {
            (ProbeState::HttpRetry(n), Classification::ConnectionError) if n < max_retries => {
                ProbeState::HttpRetry(n + 1)
            }
            (ProbeState::HttpRetry(_), Classification::ConnectionError) => ProbeState::HttpsFallback,
            (ProbeState::Done(done), _) => ProbeState::Done(done),
            (_, result) => ProbeState::Done(result),
        }
    }
}

pub struct HostProber {
    probe: Arc<dyn Probe>,
    policy: RetryPolicy,
    observer: Arc<dyn BatchObserver>,
}

impl HostProber {
    pub fn new(probe: Arc<dyn Probe>, policy: RetryPolicy, observer: Arc<dyn BatchObserver>) -> Self {
        Self {
            probe,
            policy,
            observer,
        }
    }

    /// Runs the full attempt sequence for `host`. Never fails: every path
    /// ends in a classification.
    pub async fn resolve(&self, host: Host, method: Method, timeout: Duration) -> Outcome {
        let mut state = ProbeState::HttpRetry(1);

        loop {
            let scheme = match state {
                ProbeState::HttpRetry(_) => Scheme::Http,
                ProbeState::HttpsFallback => Scheme::Https,
                ProbeState::Done(classification) => return Outcome::new(host, classification),
            };
            let attempt = ProbeAttempt {
                host: &host,
                scheme,
                method,
                timeout,
            };
            let result = self.probe.attempt(&attempt).await;
            debug!("{method} {} -> {result}", attempt.url());

            let next = state.advance(result, self.policy.max_retries);
            if let (ProbeState::HttpRetry(n), ProbeState::HttpRetry(_)) = (state, next) {
                self.observer.on_retry(&host, n, self.policy.max_retries);
                tokio::time::sleep(self.policy.backoff).await;
            }
            state = next;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use crate::scanner::observer::TracingObserver;

    /// Replays a fixed script of classifications per host and records every
    /// attempt it receives.
    #[derive(Default)]
    pub(crate) struct ScriptedProbe {
        scripts: Mutex<HashMap<String, VecDeque<Classification>>>,
        pub(crate) attempts: Mutex<Vec<(String, Scheme)>>,
    }

    impl ScriptedProbe {
        pub(crate) fn script(self, host: &str, results: &[Classification]) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(host.to_string(), results.iter().copied().collect());
            self
        }

        pub(crate) fn schemes_for(&self, host: &str) -> Vec<Scheme> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .filter(|(h, _)| h == host)
                .map(|(_, scheme)| *scheme)
                .collect()
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn attempt(&self, attempt: &ProbeAttempt<'_>) -> Classification {
            let host = attempt.host.to_string();
            self.attempts.lock().unwrap().push((host.clone(), attempt.scheme));
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&host)
                .and_then(|script| script.pop_front())
                .unwrap_or(Classification::ConnectionError)
        }
    }

    pub(crate) fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(1),
        }
    }

    fn prober(probe: Arc<ScriptedProbe>) -> HostProber {
        HostProber::new(probe, fast_policy(), Arc::new(TracingObserver))
    }

    async fn resolve(prober: &HostProber, host: &str) -> Classification {
        prober
            .resolve(Host::new(host), Method::Get, Duration::from_secs(1))
            .await
            .classification()
    }

    #[test]
    fn connection_errors_retry_then_fall_back() {
        let err = Classification::ConnectionError;
        assert_eq!(ProbeState::HttpRetry(1).advance(err, 3), ProbeState::HttpRetry(2));
        assert_eq!(ProbeState::HttpRetry(2).advance(err, 3), ProbeState::HttpRetry(3));
        assert_eq!(ProbeState::HttpRetry(3).advance(err, 3), ProbeState::HttpsFallback);
        assert_eq!(ProbeState::HttpsFallback.advance(err, 3), ProbeState::Done(err));
    }

    #[test]
    fn timeout_is_terminal_on_http() {
        let state = ProbeState::HttpRetry(1).advance(Classification::Timeout, 3);
        assert_eq!(state, ProbeState::Done(Classification::Timeout));
    }

    #[test]
    fn done_ignores_further_results() {
        let done = ProbeState::Done(Classification::StatusCode(200));
        assert_eq!(done.advance(Classification::Timeout, 3), done);
    }

    #[tokio::test]
    async fn all_connection_errors_end_as_connection_error() {
        let probe = Arc::new(ScriptedProbe::default());
        let prober = prober(probe.clone());

        assert_eq!(resolve(&prober, "c.example.com").await, Classification::ConnectionError);
        assert_eq!(
            probe.schemes_for("c.example.com"),
            vec![Scheme::Http, Scheme::Http, Scheme::Http, Scheme::Https]
        );
    }

    #[tokio::test]
    async fn first_timeout_skips_fallback() {
        let probe = Arc::new(ScriptedProbe::default().script("b.example.com", &[Classification::Timeout]));
        let prober = prober(probe.clone());

        assert_eq!(resolve(&prober, "b.example.com").await, Classification::Timeout);
        assert_eq!(probe.schemes_for("b.example.com"), vec![Scheme::Http]);
    }

    #[tokio::test]
    async fn success_on_third_http_attempt_skips_fallback() {
        let err = Classification::ConnectionError;
        let probe = Arc::new(
            ScriptedProbe::default().script("d.example.com", &[err, err, Classification::StatusCode(200)]),
        );
        let prober = prober(probe.clone());

        assert_eq!(resolve(&prober, "d.example.com").await, Classification::StatusCode(200));
        assert_eq!(probe.schemes_for("d.example.com"), vec![Scheme::Http; 3]);
    }

    #[tokio::test]
    async fn fallback_result_is_final() {
        let err = Classification::ConnectionError;
        let probe = Arc::new(
            ScriptedProbe::default()
                .script("e.example.com", &[err, err, err, Classification::StatusCode(301)])
                .script("f.example.com", &[err, err, err, Classification::Timeout]),
        );
        let prober = prober(probe.clone());

        assert_eq!(resolve(&prober, "e.example.com").await, Classification::StatusCode(301));
        assert_eq!(resolve(&prober, "f.example.com").await, Classification::Timeout);
    }

    #[tokio::test]
    async fn error_status_codes_are_not_retried() {
        let probe = Arc::new(ScriptedProbe::default().script("g.example.com", &[Classification::StatusCode(503)]));
        let prober = prober(probe.clone());

        assert_eq!(resolve(&prober, "g.example.com").await, Classification::StatusCode(503));
        assert_eq!(probe.schemes_for("g.example.com").len(), 1);
    }

    #[tokio::test]
    async fn single_retry_policy_goes_straight_to_fallback() {
        let probe = Arc::new(ScriptedProbe::default());
        let policy = RetryPolicy {
            max_retries: 1,
            backoff: Duration::from_millis(1),
        };
        let prober = HostProber::new(probe.clone(), policy, Arc::new(TracingObserver));

        assert_eq!(resolve(&prober, "h.example.com").await, Classification::ConnectionError);
        assert_eq!(probe.schemes_for("h.example.com"), vec![Scheme::Http, Scheme::Https]);
    }
}
