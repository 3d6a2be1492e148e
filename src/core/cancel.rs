//! Cancellation Coordination
//!
//! An explicit, clonable cancellation token checked cooperatively by the scan
//! pipeline, replacing exception-as-control-flow cancellation. The editor (or
//! the CLI's signal handler) cancels the token; the façade's wait and the
//! blocking worker observe it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Cooperative cancellation signal shared by one inspection request
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    tx: broadcast::Sender<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        // Room for a burst of cancel calls without dropping the signal
        let (tx, _rx) = broadcast::channel(8);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Request cancellation. Idempotent; all clones observe it.
    pub fn cancel(&self) {
        // Release pairs with the Acquire in is_cancelled so observers see
        // everything written before the cancel
        self.cancelled.store(true, Ordering::Release);
        let _ = self.tx.send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let mut rx = self.tx.subscribe();
        loop {
            // Re-check after subscribing so a cancel racing the subscription
            // is not missed
            if self.is_cancelled() {
                return;
            }
            match rx.recv().await {
                Ok(()) => return,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    // No sender left means no one can ever cancel
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire process signals to a token. CLI-only; must run inside a runtime.
///
/// A second signal forces immediate exit, matching conventional interrupt
/// behaviour for a stuck checker process.
pub fn cancel_on_signals(token: &CancellationToken) {
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if ctrl_c_token.is_cancelled() {
                log::warn!("second interrupt, exiting");
                std::process::exit(130);
            }
            log::debug!("interrupt received, cancelling scan");
            ctrl_c_token.cancel();
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term_token = token.clone();
        tokio::spawn(async move {
            if let Ok(mut term) = signal(SignalKind::terminate()) {
                if term.recv().await.is_some() {
                    log::debug!("termination signal received, cancelling scan");
                    term_token.cancel();
                }
            }
        });
    }
}
