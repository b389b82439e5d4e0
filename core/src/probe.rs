//! Per-address probe: TCP connect, TLS handshake with a fixed SNI, one HTTP
//! request, one bounded read, classification.
//!
//! Nothing that goes wrong inside a probe escapes as an error. Every failure
//! is folded into [`ProbeOutcome::Failed`].

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use sniscan_common::config::ProbeConfig;
use sniscan_common::models::outcome::{FailureReason, ProbeOutcome};
use sniscan_common::network::target::ScanTarget;
use sniscan_protocols::http::{self, RESPONSE_BUFFER_SIZE, ResponseMatcher};
use sniscan_protocols::tls::{TlsClient, TlsSetupError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Classifies a single target.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: ScanTarget) -> ProbeOutcome;
}

/// The real prober. Cheap to share: one instance serves a whole run.
#[derive(Debug)]
pub struct TlsProber {
    tls: TlsClient,
    request: Vec<u8>,
    matcher: ResponseMatcher,
    timeout: Duration,
}

impl TlsProber {
    pub fn new(cfg: &ProbeConfig) -> Result<Self, TlsSetupError> {
        Ok(Self {
            tls: TlsClient::new(&cfg.sni_host)?,
            request: http::build_request(&cfg.sni_host, &cfg.path).into_bytes(),
            matcher: ResponseMatcher::from(cfg),
            timeout: cfg.timeout,
        })
    }

    async fn fetch(&self, target: ScanTarget) -> Result<String, FailureReason> {
        let stream = bounded(
            self.timeout,
            TcpStream::connect(target.socket_addr()),
            FailureReason::Connect,
        )
        .await?;

        let tls_stream = bounded(
            self.timeout,
            self.tls.handshake(stream),
            FailureReason::Handshake,
        )
        .await?;

        exchange(tls_stream, &self.request, self.timeout).await
    }
}

#[async_trait]
impl Prober for TlsProber {
    async fn probe(&self, target: ScanTarget) -> ProbeOutcome {
        let fetched = self.fetch(target).await;
        if let Err(reason) = &fetched {
            trace!(%target, %reason, "probe failed");
        }
        classify(&self.matcher, target.addr, fetched)
    }
}

/// Sends `request` and performs exactly one read of at most
/// [`RESPONSE_BUFFER_SIZE`] bytes. The stream is dropped afterwards.
pub async fn exchange<S>(
    mut stream: S,
    request: &[u8],
    limit: Duration,
) -> Result<String, FailureReason>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    bounded(limit, stream.write_all(request), FailureReason::Io).await?;

    let mut buf = vec![0u8; RESPONSE_BUFFER_SIZE];
    let n = bounded(limit, stream.read(&mut buf), FailureReason::Io).await?;

    Ok(http::decode_response(&buf[..n]))
}

pub fn classify(
    matcher: &ResponseMatcher,
    addr: Ipv4Addr,
    fetched: Result<String, FailureReason>,
) -> ProbeOutcome {
    match fetched {
        Ok(response) if matcher.is_match(&response) => ProbeOutcome::Matched { addr, response },
        Ok(_) => ProbeOutcome::NotMatched { addr },
        Err(reason) => ProbeOutcome::Failed { addr, reason },
    }
}

async fn bounded<T, E, F>(limit: Duration, fut: F, on_error: FailureReason) -> Result<T, FailureReason>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(on_error),
        Err(_elapsed) => Err(FailureReason::Timeout),
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
