//! Cancellation signal shared by the long-running tasks

use tokio::sync::watch;

/// Owner side of a shutdown signal
///
/// Dropping the signal counts as a shutdown for every listener.
#[derive(Debug)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

/// Listener side; cheap to clone into each task
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn channel() -> (Self, ShutdownListener) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownListener { rx })
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownListener {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is triggered or the signal is dropped
    pub async fn recv(&mut self) {
        // wait_for also returns an error once the sender is gone
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
