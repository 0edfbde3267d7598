use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Local belief about whether the store connection is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Ready,
}

impl ConnectionStatus {
    fn as_u8(self) -> u8 {
        match self {
            ConnectionStatus::Disconnected => 0,
            ConnectionStatus::Connecting => 1,
            ConnectionStatus::Ready => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConnectionStatus::Connecting,
            2 => ConnectionStatus::Ready,
            _ => ConnectionStatus::Disconnected,
        }
    }
}

/// Connection lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connect attempt has started
    ConnectAttempt,
    /// Handshake finished or a command round-tripped successfully
    Ready,
    /// The transport failed (refused, dropped, I/O error, timeout)
    TransportError,
}

impl ConnectionEvent {
    /// Next status after observing this event in `current`
    pub fn apply(self, current: ConnectionStatus) -> ConnectionStatus {
        match self {
            ConnectionEvent::ConnectAttempt => match current {
                ConnectionStatus::Ready => ConnectionStatus::Ready,
                _ => ConnectionStatus::Connecting,
            },
            ConnectionEvent::Ready => ConnectionStatus::Ready,
            ConnectionEvent::TransportError => ConnectionStatus::Disconnected,
        }
    }
}

/// Thread-safe cell holding the current [`ConnectionStatus`]
///
/// Alongside the status the cell keeps a generation counter that every
/// transport error bumps. A command captures the generation before it is sent
/// and reports success with [`StatusCell::transition_from`], so a slow reply
/// cannot mark the connection ready over a newer failure.
#[derive(Debug, Clone)]
pub struct StatusCell {
    inner: Arc<AtomicU64>,
}

const STATUS_BITS: u64 = 8;
const STATUS_MASK: u64 = (1 << STATUS_BITS) - 1;

fn pack(generation: u64, status: ConnectionStatus) -> u64 {
    (generation << STATUS_BITS) | status.as_u8() as u64
}

fn unpack(raw: u64) -> (u64, ConnectionStatus) {
    (raw >> STATUS_BITS, ConnectionStatus::from_u8((raw & STATUS_MASK) as u8))
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCell {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicU64::new(pack(0, ConnectionStatus::Disconnected))),
        }
    }

    pub fn get(&self) -> ConnectionStatus {
        unpack(self.inner.load(Ordering::Acquire)).1
    }

    /// Current generation; changes whenever a transport error is recorded
    pub fn generation(&self) -> u64 {
        unpack(self.inner.load(Ordering::Acquire)).0
    }

    /// Atomically applies `event` and returns `(previous, next)`.
    pub fn transition(&self, event: ConnectionEvent) -> (ConnectionStatus, ConnectionStatus) {
        // Without an expected generation the event is never stale.
        let status = self.get();
        self.apply(event, None).unwrap_or((status, status))
    }

    /// Applies `event` only if no transport error was recorded since
    /// `generation` was read. Returns `None` when the event is stale.
    pub fn transition_from(
        &self,
        event: ConnectionEvent,
        generation: u64,
    ) -> Option<(ConnectionStatus, ConnectionStatus)> {
        self.apply(event, Some(generation))
    }

    fn apply(
        &self,
        event: ConnectionEvent,
        expected_generation: Option<u64>,
    ) -> Option<(ConnectionStatus, ConnectionStatus)> {
        let mut current = self.inner.load(Ordering::Acquire);
        loop {
            let (generation, previous) = unpack(current);
            if expected_generation.is_some_and(|expected| expected != generation) {
                return None;
            }

            let next = event.apply(previous);
            let next_generation = match event {
                ConnectionEvent::TransportError => generation.wrapping_add(1),
                _ => generation,
            };
            let next_raw = pack(next_generation, next);
            if next_raw == current {
                return Some((previous, next));
            }

            match self.inner.compare_exchange_weak(
                current,
                next_raw,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if previous != next {
                        log_transition(previous, next);
                    }
                    return Some((previous, next));
                }
                Err(actual) => current = actual,
            }
        }
    }
}

fn log_transition(previous: ConnectionStatus, next: ConnectionStatus) {
    match next {
        ConnectionStatus::Connecting => tracing::info!("Connecting to Redis..."),
        ConnectionStatus::Ready => tracing::info!("Redis connection is ready"),
        ConnectionStatus::Disconnected => {
            tracing::warn!(from = ?previous, "Redis connection lost")
        }
    }
}
