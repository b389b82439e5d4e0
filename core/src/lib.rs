//! # The sniscan scanning engine
//!
//! * **[`probe`]**: one connect, TLS handshake, request and classification per address.
//! * **[`scanner`]**: drives a bounded pool of probes over one range.
//! * **[`sink`]**: append-only persistence of matches.
//! * **[`runner`]**: walks the range list, one range at a time.
//! * **[`signal`]**: operator-initiated stop.

pub mod probe;
pub mod runner;
pub mod scanner;
pub mod signal;
pub mod sink;
