//! # Shared building blocks for sniscan
//!
//! Everything in here is free of network I/O:
//!
//! * **[`network`]**: address ranges and the targets they expand into.
//! * **[`models`]**: probe outcomes, progress counters and run summaries.
//! * **[`config`]**: scan settings and their defaults.
//! * **[`error`]**: the error taxonomy shared by the library crates.
//! * **[`utils`]**: the range-list reader.

pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod utils;
