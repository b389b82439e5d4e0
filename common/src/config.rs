use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RANGE_FILE: &str = "ranges.txt";
pub const DEFAULT_CANDIDATES_FILE: &str = "candidates.txt";
pub const DEFAULT_LOG_FILE: &str = "response_log.txt";

pub const DEFAULT_SNI_HOST: &str = "workers.uowo.de";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_STATUS_PREFIX: &str = "HTTP/1.1 200";
pub const DEFAULT_KEYWORD: &str = "workercheck";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Ranges above this many hosts get a warning before the scan starts.
pub const LARGE_RANGE_WARNING: u64 = 65_536;

/// What a single probe sends and what it expects back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Server name presented during the TLS handshake and sent as `Host`.
    pub sni_host: String,
    pub path: String,
    pub status_prefix: String,
    pub keyword: String,
    pub port: u16,
    /// Upper bound for each of connect, handshake, write and read.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sni_host: DEFAULT_SNI_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
            status_prefix: DEFAULT_STATUS_PREFIX.to_string(),
            keyword: DEFAULT_KEYWORD.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub range_file: PathBuf,
    pub candidates_file: PathBuf,
    pub log_file: PathBuf,
    pub probe: ProbeConfig,
    /// Maximum number of probes in flight within one range.
    pub concurrency: usize,
    /// Hides progress bars; matches and the summary are still printed.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range_file: PathBuf::from(DEFAULT_RANGE_FILE),
            candidates_file: PathBuf::from(DEFAULT_CANDIDATES_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            probe: ProbeConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            quiet: false,
        }
    }
}
