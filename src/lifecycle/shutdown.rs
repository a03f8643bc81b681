//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Fan-out shutdown trigger shared between the signal task and the server.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// One subscriber's view of the shutdown trigger.
///
/// Resolves when the trigger fires or when every [`Shutdown`] handle has
/// been dropped, so a server whose owner goes away still drains.
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }

    /// Number of signals not yet consumed.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub async fn recv(mut self) {
        // Closed and Lagged both mean the trigger is gone or already fired.
        let _ = self.rx.recv().await;
    }
}
