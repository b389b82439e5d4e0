//! Wire-level pieces of a probe: the TLS client and the HTTP exchange format.

pub mod http;
pub mod tls;
