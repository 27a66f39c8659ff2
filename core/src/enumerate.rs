//! Where host lists come from.
//!
//! The engine itself never discovers names. An [`Enumerator`] hands it an
//! opaque, possibly empty list; duplicates are passed through untouched.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use subprobe_common::network::Host;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("failed to launch {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{binary} exited with {status}: {stderr}")]
    Failed {
        binary: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("failed to read host list from {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait Enumerator: Send + Sync {
    async fn enumerate(&self, domain: &str) -> Result<Vec<Host>, EnumerateError>;
}

/// Runs `subfinder -d <domain> -silent` and reads one host per stdout line.
#[derive(Debug, Clone)]
pub struct SubfinderEnumerator {
    binary: PathBuf,
}

impl SubfinderEnumerator {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Enumerator for SubfinderEnumerator {
    async fn enumerate(&self, domain: &str) -> Result<Vec<Host>, EnumerateError> {
        let binary = self.binary.display().to_string();
        debug!("Running {binary} -d {domain} -silent");

        let output = Command::new(&self.binary)
            .args(["-d", domain, "-silent"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| EnumerateError::Launch {
                binary: binary.clone(),
                source,
            })?;

        let hosts = parse_host_lines(&String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if hosts.is_empty() {
                return Err(EnumerateError::Failed {
                    binary,
                    status: output.status,
                    stderr,
                });
            }
            warn!("{binary} exited with {}, using the {} hosts it printed", output.status, hosts.len());
        }
        Ok(hosts)
    }
}

/// A host list kept in a file, or piped on stdin when no path (or `-`) is
/// given. The list already is the target set, so the domain is ignored.
#[derive(Debug, Clone)]
pub struct HostListEnumerator {
    path: Option<PathBuf>,
}

impl HostListEnumerator {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Enumerator for HostListEnumerator {
    async fn enumerate(&self, _domain: &str) -> Result<Vec<Host>, EnumerateError> {
        read_host_list(self.path.as_deref()).await
    }
}

async fn read_host_list(path: Option<&Path>) -> Result<Vec<Host>, EnumerateError> {
    let text = match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| EnumerateError::Read {
                source_name: path.display().to_string(),
                source,
            })?,
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|source| EnumerateError::Read {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            text
        }
    };
    Ok(parse_host_lines(&text))
}

/// One host per line. Blank lines and `#` comments are skipped; order and
/// duplicates are preserved.
pub fn parse_host_lines(text: &str) -> Vec<Host> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.parse::<Host>().ok())
        .collect()
}
