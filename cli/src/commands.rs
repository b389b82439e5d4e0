pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::TypedValueParser;
use sniscan_common::config::{self, Config, ProbeConfig};

#[derive(Parser, Debug)]
#[command(name = "sniscan")]
#[command(version)]
#[command(about = "Finds hosts in IPv4 ranges that serve a given site behind TLS.")]
pub struct CommandLine {
    /// File with one CIDR range per line
    #[arg(short, long, default_value = config::DEFAULT_RANGE_FILE)]
    pub ranges: PathBuf,

    /// Matched addresses are appended here, one per line
    #[arg(long, default_value = config::DEFAULT_CANDIDATES_FILE)]
    pub candidates: PathBuf,

    /// Raw responses of matched addresses are appended here
    #[arg(long, default_value = config::DEFAULT_LOG_FILE)]
    pub log: PathBuf,

    /// Server name sent in the TLS handshake and the Host header
    #[arg(long, default_value = config::DEFAULT_SNI_HOST)]
    pub sni: String,

    /// Request path
    #[arg(long, default_value = config::DEFAULT_PATH)]
    pub path: String,

    /// Text the response must contain as its status line
    #[arg(long, default_value = config::DEFAULT_STATUS_PREFIX)]
    pub status: String,

    /// Text the response must contain somewhere
    #[arg(short, long, default_value = config::DEFAULT_KEYWORD)]
    pub keyword: String,

    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Per-operation timeout in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Probes in flight per range
    #[arg(
        short,
        long,
        default_value_t = config::DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u32).range(1..).map(|n| n as usize)
    )]
    pub concurrency: usize,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        Config {
            range_file: self.ranges,
            candidates_file: self.candidates,
            log_file: self.log,
            probe: ProbeConfig {
                sni_host: self.sni,
                path: self.path,
                status_prefix: self.status,
                keyword: self.keyword,
                port: self.port,
                timeout: Duration::from_secs(self.timeout),
            },
            concurrency: self.concurrency,
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_consistent() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn defaults_match_config_defaults() {
        let cfg = CommandLine::try_parse_from(["sniscan"]).unwrap().into_config();
        let default = Config::default();
        assert_eq!(cfg.range_file, default.range_file);
        assert_eq!(cfg.candidates_file, default.candidates_file);
        assert_eq!(cfg.log_file, default.log_file);
        assert_eq!(cfg.probe, default.probe);
        assert_eq!(cfg.concurrency, default.concurrency);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(CommandLine::try_parse_from(["sniscan", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = CommandLine::try_parse_from([
            "sniscan", "--ranges", "nets.txt", "--sni", "example.org", "-p", "8443", "-t", "5", "-c", "64",
        ])
        .unwrap()
        .into_config();

        assert_eq!(cfg.range_file, PathBuf::from("nets.txt"));
        assert_eq!(cfg.probe.sni_host, "example.org");
        assert_eq!(cfg.probe.port, 8443);
        assert_eq!(cfg.probe.timeout, Duration::from_secs(5));
        assert_eq!(cfg.concurrency, 64);
    }
}
