//! Lock-free connection state and traffic counters

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Lifecycle of a single WebSocket connection
///
/// ```text
/// Disconnected --start--> Connecting --handshake ok--> Connected
/// Connecting | Connected --stop / close / error--> Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Whether a connection is alive or being established
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Atomic holder for [`ConnectionState`], shared between the client handle
/// and its I/O task
#[derive(Debug)]
pub struct AtomicConnectionState(AtomicU8);

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move from `from` to `to` only if the current state is `from`
    ///
    /// Returns `true` when the transition happened.
    pub fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    #[inline]
    pub fn is_connecting(&self) -> bool {
        self.get() == ConnectionState::Connecting
    }

    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }
}

impl Default for AtomicConnectionState {
    fn default() -> Self {
        Self::new(ConnectionState::Disconnected)
    }
}

/// Traffic counters updated from the I/O task
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    messages_discarded: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a frame that was dropped (not of interest or malformed)
    #[inline]
    pub fn increment_discarded(&self) {
        self.messages_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn messages_discarded(&self) -> u64 {
        self.messages_discarded.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_atomic() {
        let state = AtomicConnectionState::default();
        assert!(state.is_disconnected());

        state.set(ConnectionState::Connecting);
        assert!(state.is_connecting());

        state.set(ConnectionState::Connected);
        assert!(state.is_connected());
        assert_eq!(state.get(), ConnectionState::Connected);
    }

    #[test]
    fn test_transition_only_from_expected_state() {
        let state = AtomicConnectionState::new(ConnectionState::Disconnected);

        // Handshake completing after a stop must not resurrect the connection
        assert!(!state.transition(ConnectionState::Connecting, ConnectionState::Connected));
        assert!(state.is_disconnected());

        assert!(state.transition(ConnectionState::Disconnected, ConnectionState::Connecting));
        assert!(state.transition(ConnectionState::Connecting, ConnectionState::Connected));
        assert!(state.is_connected());
    }

    #[test]
    fn test_is_live() {
        assert!(!ConnectionState::Disconnected.is_live());
        assert!(ConnectionState::Connecting.is_live());
        assert!(ConnectionState::Connected.is_live());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
    }
}
