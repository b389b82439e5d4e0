//! Error taxonomy shared by the library crates.
//!
//! Probe-level failures are deliberately absent: they are data
//! ([`ProbeOutcome::Failed`](crate::models::outcome::ProbeOutcome::Failed)),
//! never errors.

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

/// A line of the range list that is not a valid IPv4 network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    #[error("invalid address in range '{0}'")]
    Address(String),
    #[error("invalid prefix length in range '{0}'")]
    Prefix(String),
    #[error("prefix length {prefix} exceeds 32 in range '{spec}'")]
    PrefixTooLong { spec: String, prefix: u8 },
}

/// Failure to persist a match.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to append to '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Run- and range-level failures surfaced to the operator.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The range list is missing or unreadable. Fatal.
    #[error("cannot read range list '{}'", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The range list exists but holds no ranges. Fatal.
    #[error("range list '{}' contains no ranges", .path.display())]
    NoRanges { path: PathBuf },
    /// The result stores could not be opened. Fatal.
    #[error("cannot open result store")]
    Store(#[from] SinkError),
    /// A match could not be written; the current range is abandoned.
    #[error("failed to record match for {addr}")]
    Sink {
        addr: Ipv4Addr,
        #[source]
        source: SinkError,
    },
}
