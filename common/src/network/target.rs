//! # Scan Target Model
//!
//! A single host/port pair handed to a prober. Targets are created lazily
//! from an [`AddressRange`](crate::network::range::AddressRange) and live
//! only as long as one probe.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanTarget {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl ScanTarget {
    pub fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.addr, self.port))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_uses_port() {
        let target = ScanTarget::new(Ipv4Addr::new(192, 0, 2, 1), 443);
        assert_eq!(target.socket_addr(), "192.0.2.1:443".parse().unwrap());
        assert_eq!(target.to_string(), "192.0.2.1:443");
    }
}
