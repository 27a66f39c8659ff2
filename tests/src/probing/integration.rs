#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use subprobe_common::config::ProbeConfig;
use subprobe_common::network::{Classification, Host, Method, ProbeAttempt, Scheme};
use subprobe_core::export;
use subprobe_core::gate::{MeteredGate, SemaphoreGate};
use subprobe_core::probe::{HttpProbe, Probe};
use subprobe_core::prober::{HostProber, RetryPolicy};
use subprobe_core::scanner::{BatchCoordinator, TracingObserver};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{RecordingProbe, closed_host, host_of};

const FAST_RETRY: RetryPolicy = RetryPolicy {
    max_retries: 3,
    backoff: Duration::from_millis(10),
};

async fn server_answering(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

async fn attempt(host: &Host, method: Method, timeout: Duration) -> Classification {
    let probe = HttpProbe::new().unwrap();
    let attempt = ProbeAttempt {
        host,
        scheme: Scheme::Http,
        method,
        timeout,
    };
    probe.attempt(&attempt).await
}

fn test_config(concurrency: usize) -> ProbeConfig {
    ProbeConfig {
        timeout: Duration::from_millis(500),
        concurrency,
        backoff: Duration::from_millis(10),
        ..Default::default()
    }
}

#[tokio::test]
async fn any_received_status_is_reported() {
    for status in [200, 404, 500] {
        let server = server_answering(status).await;
        let result = attempt(&host_of(&server), Method::Get, Duration::from_secs(2)).await;
        assert_eq!(result, Classification::StatusCode(status));
    }
}

#[tokio::test]
async fn request_method_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let host = host_of(&server);
    let timeout = Duration::from_secs(2);
    assert_eq!(attempt(&host, Method::Head, timeout).await, Classification::StatusCode(204));
    assert_eq!(attempt(&host, Method::Post, timeout).await, Classification::StatusCode(201));
    // No GET mock is mounted; wiremock answers 404.
    assert_eq!(attempt(&host, Method::Get, timeout).await, Classification::StatusCode(404));
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "http://127.0.0.1:9/elsewhere"))
        .mount(&server)
        .await;

    let result = attempt(&host_of(&server), Method::Get, Duration::from_secs(2)).await;
    assert_eq!(result, Classification::StatusCode(301));
}

#[tokio::test]
async fn slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let result = attempt(&host_of(&server), Method::Get, Duration::from_millis(200)).await;
    assert_eq!(result, Classification::Timeout);
}

#[tokio::test]
async fn refused_connection_is_a_connection_error() {
    let result = attempt(&closed_host(), Method::Get, Duration::from_secs(2)).await;
    assert_eq!(result, Classification::ConnectionError);
}

#[tokio::test]
async fn unreachable_host_exhausts_http_then_tries_https_once() {
    let probe = Arc::new(RecordingProbe::new());
    let prober = HostProber::new(probe.clone(), FAST_RETRY, Arc::new(TracingObserver));
    let host = closed_host();

    let outcome = prober
        .resolve(host.clone(), Method::Get, Duration::from_secs(1))
        .await;

    assert_eq!(outcome.classification(), Classification::ConnectionError);
    assert_eq!(
        probe.schemes_for(&host),
        vec![Scheme::Http, Scheme::Http, Scheme::Http, Scheme::Https]
    );
}

#[tokio::test]
async fn slow_host_is_never_retried_over_https() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let probe = Arc::new(RecordingProbe::new());
    let prober = HostProber::new(probe.clone(), FAST_RETRY, Arc::new(TracingObserver));
    let host = host_of(&server);

    let outcome = prober
        .resolve(host.clone(), Method::Get, Duration::from_millis(200))
        .await;

    assert_eq!(outcome.classification(), Classification::Timeout);
    assert_eq!(probe.schemes_for(&host), vec![Scheme::Http]);
}

#[tokio::test]
async fn live_batch_is_complete_and_ranked() {
    let ok = server_answering(200).await;
    let broken = server_answering(500).await;
    let dead = closed_host();

    let hosts = vec![dead.clone(), host_of(&ok), host_of(&broken), host_of(&ok)];
    let coordinator = BatchCoordinator::new(&test_config(2), Arc::new(HttpProbe::new().unwrap())).unwrap();

    let results = coordinator
        .run(hosts.clone(), &CancellationToken::new())
        .await
        .unwrap();
    let ranked = results.ranked();

    assert_eq!(ranked.len(), hosts.len());
    let records = export::to_records(&ranked);
    assert_eq!(records[0].status, "500");
    assert_eq!(records[1].status, "200");
    assert_eq!(records[2].status, "200");
    assert_eq!(records[3].host, dead.to_string());
    assert_eq!(records[3].status, "Connection Error");
}

#[tokio::test]
async fn ceiling_holds_against_a_real_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(20)))
        .mount(&server)
        .await;

    let gate = Arc::new(MeteredGate::new(SemaphoreGate::new(5)));
    let coordinator = BatchCoordinator::new(&test_config(5), Arc::new(HttpProbe::new().unwrap()))
        .unwrap()
        .with_gate(gate.clone());

    let hosts: Vec<Host> = (0..30).map(|_| host_of(&server)).collect();
    let results = coordinator
        .run(hosts, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 30);
    assert!(results
        .snapshot()
        .iter()
        .all(|o| o.classification() == Classification::StatusCode(200)));
    assert!(gate.peak() <= 5, "peak in flight was {}", gate.peak());
}
