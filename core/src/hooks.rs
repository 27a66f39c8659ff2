//! Per-host side effects.
//!
//! An [`OutcomeHook`] runs after a host has its outcome and its permit has
//! been released. Errors are reported back to the coordinator, which logs
//! them and moves on; a failing hook never stops the batch.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, ensure};
use async_trait::async_trait;
use subprobe_common::network::{Classification, Outcome, Scheme};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::debug;

#[async_trait]
pub trait OutcomeHook: Send + Sync {
    async fn on_host_done(&self, outcome: &Outcome) -> anyhow::Result<()>;
}

/// Runs an external command for every host answering with a given status.
///
/// The template is split on whitespace. In any argument `{host}` is replaced
/// by the host and `{url}` by its plain http URL. This is where screenshot
/// or fingerprinting tools attach, e.g. `gowitness scan single --url {url}`.
///
/// Hooks run after the probe permit is released, so the number of commands
/// alive at once is capped separately.
#[derive(Debug, Clone)]
pub struct CommandHook {
    status: u16,
    template: Vec<String>,
    slots: Arc<Semaphore>,
}

const DEFAULT_PARALLELISM: usize = 4;

impl CommandHook {
    pub fn new(status: u16, template: &str) -> anyhow::Result<Self> {
        let template: Vec<String> = template.split_whitespace().map(String::from).collect();
        ensure!(!template.is_empty(), "hook command must not be empty");
        Ok(Self {
            status,
            template,
            slots: Arc::new(Semaphore::new(DEFAULT_PARALLELISM)),
        })
    }

    pub fn matches(&self, outcome: &Outcome) -> bool {
        outcome.classification() == Classification::StatusCode(self.status)
    }

    fn render(&self, outcome: &Outcome) -> Vec<String> {
        let host = outcome.host();
        let url = host.url(Scheme::Http);
        self.template
            .iter()
            .map(|arg| arg.replace("{url}", &url).replace("{host}", host.as_str()))
            .collect()
    }
}

#[async_trait]
impl OutcomeHook for CommandHook {
    async fn on_host_done(&self, outcome: &Outcome) -> anyhow::Result<()> {
        if !self.matches(outcome) {
            return Ok(());
        }

        let argv = self.render(outcome);
        let (program, args) = argv.split_first().context("hook command must not be empty")?;
        let _slot = self.slots.acquire().await.context("hook slots closed")?;
        debug!("Running hook for {}: {}", outcome.host(), argv.join(" "));

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("failed to launch {program}"))?;

        ensure!(status.success(), "{program} exited with {status} for {}", outcome.host());
        Ok(())
    }
}
