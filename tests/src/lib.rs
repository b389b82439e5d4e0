//! End-to-end scenarios: range list on disk, stub prober, real result stores.

mod run;
mod util;
