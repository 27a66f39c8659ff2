use std::net::TcpListener;
use std::sync::Mutex;

use async_trait::async_trait;
use subprobe_common::network::{Classification, Host, ProbeAttempt, Scheme};
use subprobe_core::probe::{HttpProbe, Probe};
use wiremock::MockServer;

/// Host string (`127.0.0.1:port`) of a running mock server.
pub fn host_of(server: &MockServer) -> Host {
    Host::new(server.address().to_string())
}

/// A host on a local port nothing listens on.
pub fn closed_host() -> Host {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Host::new(addr.to_string())
}

/// Real [`HttpProbe`] that also remembers which schemes were tried.
pub struct RecordingProbe {
    inner: HttpProbe,
    schemes: Mutex<Vec<(String, Scheme)>>,
}

impl RecordingProbe {
    pub fn new() -> Self {
        Self {
            inner: HttpProbe::new().expect("http client"),
            schemes: Mutex::new(Vec::new()),
        }
    }

    pub fn schemes_for(&self, host: &Host) -> Vec<Scheme> {
        self.schemes
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| h == host.as_str())
            .map(|(_, scheme)| *scheme)
            .collect()
    }
}

#[async_trait]
impl Probe for RecordingProbe {
    async fn attempt(&self, attempt: &ProbeAttempt<'_>) -> Classification {
        self.schemes
            .lock()
            .unwrap()
            .push((attempt.host.to_string(), attempt.scheme));
        self.inner.attempt(attempt).await
    }
}
