pub mod batch;
pub mod probe;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use subprobe_common::config::ProbeConfig;
use subprobe_common::network::Method;
use subprobe_core::hooks::CommandHook;

#[derive(Parser)]
#[command(name = "subprobe")]
#[command(version, about = "Subdomain enumeration and HTTP liveness probing.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Hide banner and headers (-q), or print only result lines (-qq)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Log every attempt and retry
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find subdomains of a domain with subfinder, then probe them
    #[command(alias = "s")]
    Scan {
        /// Domain to find subdomains for
        domain: String,

        /// Path to the subfinder binary
        #[arg(long, default_value = "subfinder")]
        subfinder: PathBuf,

        #[command(flatten)]
        args: ProbeArgs,
    },
    /// Probe hosts listed one per line in a file, or on stdin
    #[command(alias = "p")]
    Probe {
        /// Host list; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        #[command(flatten)]
        args: ProbeArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Type of HTTP request to make (GET, POST or HEAD)
    #[arg(short = 'r', long = "request-type", default_value = "GET")]
    pub method: Method,

    /// Timeout for each request, in seconds
    #[arg(short, long, default_value = "3.0", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Max number of hosts probed at the same time
    #[arg(short, long, default_value_t = 100)]
    pub concurrency: usize,

    /// Attempts over http before falling back to https
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Pause between http attempts, in seconds
    #[arg(long, default_value = "1.0", value_parser = parse_seconds)]
    pub backoff: Duration,

    /// Write ranked `host, status` lines to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Status code that triggers the --exec command
    #[arg(long, requires = "exec")]
    pub match_code: Option<u16>,

    /// Command run for every host answering with --match-code; `{host}` and `{url}` are substituted
    #[arg(long, requires = "match_code")]
    pub exec: Option<String>,
}

impl ProbeArgs {
    pub fn to_config(&self) -> ProbeConfig {
        ProbeConfig {
            method: self.method,
            timeout: self.timeout,
            concurrency: self.concurrency,
            retries: self.retries,
            backoff: self.backoff,
        }
    }

    pub fn hook(&self) -> anyhow::Result<Option<CommandHook>> {
        match (self.match_code, &self.exec) {
            (Some(code), Some(template)) => Ok(Some(CommandHook::new(code, template)?)),
            _ => Ok(None),
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("not a number of seconds: {s}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {s}: {e}"))
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
