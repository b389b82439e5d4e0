//! Stop signal shared between the operator's interrupt and the scan loops.

use std::sync::Arc;

use tokio::sync::watch;

/// Held by whoever may stop the run (the Ctrl-C handler).
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observed by the runner and the coordinator.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        stop_signal().1
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once a stop was requested. Never resolves if every
    /// [`StopHandle`] is gone without stopping.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stop_wakes_waiters() {
        let (handle, mut signal) = stop_signal();
        assert!(!signal.is_stopped());

        let waiter = tokio::spawn(async move {
            signal.stopped().await;
            signal.is_stopped()
        });
        handle.stop();

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn never_does_not_resolve() {
        let mut signal = StopSignal::never();
        let res = tokio::time::timeout(Duration::from_millis(50), signal.stopped()).await;
        assert!(res.is_err());
        assert!(!signal.is_stopped());
    }
}
