use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use subprobe_common::config::Config;
use subprobe_core::enumerate::{Enumerator, SubfinderEnumerator};
use tracing::info;

use crate::commands::{ProbeArgs, batch};
use crate::terminal::{colors, print};

pub async fn scan(domain: String, subfinder: PathBuf, args: ProbeArgs, cfg: &Config) -> anyhow::Result<()> {
    if cfg.quiet == 0 {
        print::aligned_line("Domain", domain.as_str().color(colors::TEXT_DEFAULT), 0);
    }
    info!("Finding subdomains for {domain}");

    let enumerator = SubfinderEnumerator::with_binary(subfinder);
    let hosts = enumerator
        .enumerate(&domain)
        .await
        .with_context(|| format!("enumerating subdomains of {domain}"))?;
    info!("Found {} subdomains", hosts.len());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{domain}.txt")));

    batch::probe_hosts(hosts, &args, cfg, Some(&output)).await
}
