//! A single HTTP request attempt against one host.
//!
//! No retries happen at this layer; [`crate::prober`] owns the policy.

use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use subprobe_common::network::{Classification, Method, ProbeAttempt};
use tracing::debug;

/// Issues exactly one request and classifies what came back.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn attempt(&self, attempt: &ProbeAttempt<'_>) -> Classification;
}

/// [`Probe`] backed by a shared `reqwest` client.
///
/// Redirects are not followed, so the reported code is the one the host
/// answered with. Certificates are verified; a TLS failure is a
/// [`Classification::ConnectionError`] like any other transport failure.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn attempt(&self, attempt: &ProbeAttempt<'_>) -> Classification {
        let url = attempt.url();
        let result = self
            .client
            .request(to_reqwest_method(attempt.method), &url)
            .timeout(attempt.timeout)
            .send()
            .await;

        match result {
            Ok(response) => Classification::StatusCode(response.status().as_u16()),
            Err(err) => {
                debug!("{} {url} failed: {err}", attempt.method);
                classify_error(&err)
            }
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Head => reqwest::Method::HEAD,
    }
}

/// A missed deadline (connect or response) is a timeout; everything else is
/// a connection error.
fn classify_error(err: &reqwest::Error) -> Classification {
    if err.is_timeout() {
        Classification::Timeout
    } else {
        Classification::ConnectionError
    }
}
