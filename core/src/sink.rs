//! Append-only persistence of matches.
//!
//! Two stores are written for every match: the candidates store (one
//! address per line) and the response log (one delimited block per match).
//! All writers go through a single lock so a record is never interleaved
//! with another one, and files are only ever opened in append mode.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sniscan_common::error::SinkError;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

const LOG_HEAD_WIDTH: usize = 21;
const LOG_TAIL_WIDTH: usize = 20;

/// Receives every matched address together with its raw response.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record_match(&self, addr: Ipv4Addr, response: &str) -> Result<(), SinkError>;
}

pub fn format_candidate(addr: Ipv4Addr) -> String {
    format!("{addr}\n")
}

pub fn format_log_block(addr: Ipv4Addr, response: &str) -> String {
    format!(
        "{}\nIP: {addr}\nResponse:\n{response}\n{}\n\n",
        "=".repeat(LOG_HEAD_WIDTH),
        "=".repeat(LOG_TAIL_WIDTH),
    )
}

struct Store {
    path: PathBuf,
    file: File,
}

impl Store {
    async fn open(path: PathBuf) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self { path, file })
    }

    async fn append(&mut self, record: &str) -> Result<(), SinkError> {
        let result = async {
            self.file.write_all(record.as_bytes()).await?;
            self.file.flush().await
        }
        .await;

        result.map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

struct Stores {
    candidates: Store,
    log: Store,
}

/// File-backed [`ResultSink`].
pub struct FileSink {
    stores: Mutex<Stores>,
}

impl FileSink {
    /// Opens (creating if needed) both stores. Existing content is kept.
    pub async fn open(
        candidates: impl AsRef<Path>,
        log: impl AsRef<Path>,
    ) -> Result<Self, SinkError> {
        let candidates = Store::open(candidates.as_ref().to_path_buf()).await?;
        let log = Store::open(log.as_ref().to_path_buf()).await?;
        debug!(
            candidates = %candidates.path.display(),
            log = %log.path.display(),
            "result stores opened"
        );

        Ok(Self {
            stores: Mutex::new(Stores { candidates, log }),
        })
    }
}

#[async_trait]
impl ResultSink for FileSink {
    async fn record_match(&self, addr: Ipv4Addr, response: &str) -> Result<(), SinkError> {
        let candidate = format_candidate(addr);
        let block = format_log_block(addr, response);

        let mut stores = self.stores.lock().await;
        stores.candidates.append(&candidate).await?;
        stores.log.append(&block).await
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
