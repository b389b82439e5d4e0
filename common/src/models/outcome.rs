use std::fmt;
use std::net::Ipv4Addr;

/// Why a probe could not be completed. Only used for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Connect,
    Handshake,
    Io,
    Timeout,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::Connect => "connect failed",
            FailureReason::Handshake => "tls handshake failed",
            FailureReason::Io => "i/o error",
            FailureReason::Timeout => "timed out",
        };
        f.write_str(s)
    }
}

/// Result of probing one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target answered with the expected status line and keyword.
    Matched { addr: Ipv4Addr, response: String },
    /// The target answered, but it is not the service we are looking for.
    NotMatched { addr: Ipv4Addr },
    /// Connect, handshake, write or read did not succeed.
    Failed { addr: Ipv4Addr, reason: FailureReason },
}

impl ProbeOutcome {
    pub fn addr(&self) -> Ipv4Addr {
        match self {
            ProbeOutcome::Matched { addr, .. }
            | ProbeOutcome::NotMatched { addr }
            | ProbeOutcome::Failed { addr, .. } => *addr,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, ProbeOutcome::Matched { .. })
    }
}
