//! Connection state supervision
//!
//! A [`Connector`] owns a background task probing the store and publishing
//! [`ConnectionState`] transitions on a watch channel. The HTTP listener is
//! only bound once [`ConnectionMonitor::ready`] resolves.

use std::{fmt, sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use super::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Errored(String),
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Errored(_) => write!(f, "errored"),
        }
    }
}

/// Read side of the connection state, cloned into the application state
#[derive(Clone, Debug)]
pub struct ConnectionMonitor {
    rx: watch::Receiver<ConnectionState>,
}

impl ConnectionMonitor {
    pub fn state(&self) -> ConnectionState {
        self.rx.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        *self.rx.borrow() == ConnectionState::Connected
    }

    /// Resolve once the store has reported `Connected`.
    ///
    /// Returns immediately when already connected. If the supervising task has
    /// gone away without ever connecting, this never resolves.
    pub async fn ready(&self) {
        let mut rx = self.rx.clone();
        let connected = rx
            .wait_for(|state| *state == ConnectionState::Connected)
            .await
            .is_ok();
        if !connected {
            std::future::pending::<()>().await;
        }
    }
}

/// Write side of the connection state
pub struct Connector {
    tx: watch::Sender<ConnectionState>,
}

impl Connector {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ConnectionState::Connecting);
        Self { tx }
    }

    /// A connector that starts out connected, for stores with no remote end
    pub fn connected() -> Self {
        let connector = Self::new();
        connector.transition(ConnectionState::Connected);
        connector
    }

    pub fn monitor(&self) -> ConnectionMonitor {
        ConnectionMonitor {
            rx: self.tx.subscribe(),
        }
    }

    /// Record a state change, logging it if it differs from the current state
    pub fn transition(&self, next: ConnectionState) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next.clone();
            true
        });

        if !changed {
            return;
        }

        match &next {
            ConnectionState::Connected => tracing::info!("Store connected"),
            ConnectionState::Disconnected => tracing::warn!("Store is disconnected"),
            ConnectionState::Errored(reason) => {
                tracing::error!("Store connection error: {}", reason)
            }
            ConnectionState::Connecting => tracing::debug!("Store connecting"),
        }
    }

    /// Apply the outcome of one probe to the current state
    fn observe(&self, probe: Result<(), String>) {
        let current = self.tx.borrow().clone();
        let next = match (probe, current) {
            (Ok(()), _) => ConnectionState::Connected,
            (Err(_), ConnectionState::Connected) => ConnectionState::Disconnected,
            (Err(_), ConnectionState::Disconnected) => ConnectionState::Disconnected,
            (Err(reason), _) => ConnectionState::Errored(reason),
        };
        self.transition(next);
    }

    /// Spawn the probing task. Errors are logged and never stop the loop.
    pub fn spawn(self, store: Arc<dyn RecordStore>, heartbeat: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(heartbeat);
            // A ping slower than the heartbeat must not be followed by a burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let probe = store.ping().await.map_err(|e| e.to_string());
                self.observe(probe);
            }
        })
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new()
    }
}
