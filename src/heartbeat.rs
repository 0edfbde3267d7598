//! Background store heartbeat
//!
//! Sends a PING on a fixed interval so the connection status tracks the
//! store's reachability between requests. Each PING goes through the normal
//! command path: a reply marks the connection ready, a transport failure
//! marks it disconnected, and while no connection was ever established each
//! tick is also a fresh connect attempt.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::store::StoreClient;

/// A handle to the running heartbeat.
///
/// The heartbeat task stops when this handle is dropped.
#[derive(Debug)]
pub struct Heartbeat {
    shutdown_tx: watch::Sender<bool>,
}

impl Heartbeat {
    pub fn start(store: StoreClient, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(heartbeat_loop(store, interval, shutdown_rx));
        info!(interval_ms = interval.as_millis() as u64, "Redis heartbeat started");
        Self { shutdown_tx }
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn heartbeat_loop(
    store: StoreClient,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Redis heartbeat received shutdown signal");
                    return;
                }
            }
        }

        match store.ping().await {
            Ok(_) => debug!(status = ?store.status(), "Redis heartbeat ok"),
            Err(e) => debug!(status = ?store.status(), error = %e, "Redis heartbeat failed"),
        }
    }
}
