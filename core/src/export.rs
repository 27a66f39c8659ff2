//! Flat records for line-oriented or tabular output.

use std::fmt;
use std::io::{self, Write};

use subprobe_common::network::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub host: String,
    /// The numeric code, `Connection Error` or `Timeout`.
    pub status: String,
}

impl From<&Outcome> for ExportRecord {
    fn from(outcome: &Outcome) -> Self {
        Self {
            host: outcome.host().to_string(),
            status: outcome.classification().to_string(),
        }
    }
}

impl fmt::Display for ExportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.host, self.status)
    }
}

/// Converts already ranked outcomes, keeping their order.
pub fn to_records(ranked: &[Outcome]) -> Vec<ExportRecord> {
    ranked.iter().map(ExportRecord::from).collect()
}

/// Writes `host, status` per line.
pub fn write_lines<W: Write>(mut writer: W, records: &[ExportRecord]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()
}
