use std::path::PathBuf;

use anyhow::Context;
use subprobe_common::config::Config;
use subprobe_core::enumerate::{Enumerator, HostListEnumerator};
use tracing::info;

use crate::commands::{ProbeArgs, batch};

pub async fn probe(file: Option<PathBuf>, args: ProbeArgs, cfg: &Config) -> anyhow::Result<()> {
    let hosts = HostListEnumerator::new(file)
        .enumerate("")
        .await
        .context("loading hosts to probe")?;
    info!("Loaded {} hosts", hosts.len());

    batch::probe_hosts(hosts, &args, cfg, args.output.as_deref()).await
}
