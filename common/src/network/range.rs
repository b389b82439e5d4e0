//! # IPv4 Range Model
//!
//! Parses CIDR-style range specifications (`203.0.113.0/24`) and expands
//! them into the host addresses that are worth probing.
//!
//! Expansion rules:
//! * `/32` is a single host and yields exactly that address.
//! * `/31` yields nothing: network and broadcast are excluded uniformly,
//!   so there is no point-to-point special case.
//! * Anything wider yields every address except the network and broadcast.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::RangeParseError;
use crate::network::target::ScanTarget;

/// A parsed IPv4 network block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    network: Ipv4Network,
}

impl AddressRange {
    /// Builds a range from a base address and prefix. Host bits are masked off.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, RangeParseError> {
        let spec = format!("{addr}/{prefix}");
        if prefix > 32 {
            return Err(RangeParseError::PrefixTooLong { spec, prefix });
        }

        let network = Ipv4Network::new(addr, prefix)
            .and_then(|net| Ipv4Network::new(net.network(), prefix))
            .map_err(|_| RangeParseError::Prefix(spec))?;

        Ok(Self { network })
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn broadcast_addr(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// Number of addresses [`hosts`](Self::hosts) will yield.
    pub fn host_count(&self) -> u64 {
        self.host_bounds()
            .map_or(0, |(first, last)| u64::from(last - first) + 1)
    }

    /// Usable host addresses in ascending order.
    ///
    /// The iterator is lazy and a pure function of the range, so calling this
    /// twice produces the same sequence.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + Clone + Send + 'static {
        self.host_bounds()
            .into_iter()
            .flat_map(|(first, last)| (first..=last).map(Ipv4Addr::from))
    }

    /// Pairs every host with `port`.
    pub fn targets(&self, port: u16) -> impl Iterator<Item = ScanTarget> + Send + 'static {
        self.hosts().map(move |addr| ScanTarget::new(addr, port))
    }

    fn host_bounds(&self) -> Option<(u32, u32)> {
        let first: u32 = self.network.network().into();
        let last: u32 = self.network.broadcast().into();

        match self.network.prefix() {
            32 => Some((first, last)),
            31 => None,
            _ => Some((first + 1, last - 1)),
        }
    }
}

impl FromStr for AddressRange {
    type Err = RangeParseError;

    /// Parses `a.b.c.d/p`. A bare address is treated as `/32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = addr_str
            .parse::<Ipv4Addr>()
            .map_err(|_| RangeParseError::Address(s.to_string()))?;

        let prefix = match prefix_str {
            Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => p
                .parse::<u8>()
                .map_err(|_| RangeParseError::Prefix(s.to_string()))?,
            Some(_) => return Err(RangeParseError::Prefix(s.to_string())),
            None => 32,
        };

        if prefix > 32 {
            return Err(RangeParseError::PrefixTooLong {
                spec: s.to_string(),
                prefix,
            });
        }

        Self::new(addr, prefix)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network.network(), self.network.prefix())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
