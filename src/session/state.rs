//! Wallet connection state.

use serde::Serialize;

use crate::blockchain::types::Address;
use crate::session::sdk::{ConnectionError, SessionEvent};

/// Current wallet connection status.
///
/// Only [`SessionState::apply`] changes it, so `is_connected` always comes
/// with a `connected_address`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    is_connected: bool,
    is_loading: bool,
    last_error: Option<ConnectionError>,
    connected_address: Option<Address>,
    /// Authentication round trips started so far. Never reset.
    auth_attempts: u64,
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&ConnectionError> {
        self.last_error.as_ref()
    }

    pub fn connected_address(&self) -> Option<&Address> {
        self.connected_address.as_ref()
    }

    /// Number of `Loading` events seen. Lets a view tell a new round trip
    /// apart from state left over by an earlier one.
    pub fn auth_attempts(&self) -> u64 {
        self.auth_attempts
    }

    /// Fold one SDK lifecycle event into the state.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Loading => {
                self.auth_attempts += 1;
                self.is_loading = true;
                self.last_error = None;
            }
            SessionEvent::Connected { address } => {
                self.is_connected = true;
                self.is_loading = false;
                self.last_error = None;
                self.connected_address = Some(address);
            }
            SessionEvent::Disconnected => {
                *self = SessionState {
                    auth_attempts: self.auth_attempts,
                    ..SessionState::default()
                };
            }
            SessionEvent::ConnectFailed(error) => {
                self.is_connected = false;
                self.is_loading = false;
                self.connected_address = None;
                self.last_error = Some(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse().unwrap()
    }

    #[test]
    fn test_connect_lifecycle() {
        let mut state = SessionState::default();
        assert!(!state.is_connected());

        state.apply(SessionEvent::Loading);
        assert!(state.is_loading());

        state.apply(SessionEvent::Connected { address: addr() });
        assert!(state.is_connected());
        assert!(!state.is_loading());
        assert_eq!(state.connected_address(), Some(&addr()));

        state.apply(SessionEvent::Disconnected);
        assert!(!state.is_connected());
        assert!(state.connected_address().is_none());
        assert_eq!(state.auth_attempts(), 1);
    }

    #[test]
    fn test_failure_clears_connection() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::Connected { address: addr() });
        state.apply(SessionEvent::ConnectFailed(ConnectionError::new("popup closed")));

        assert!(!state.is_connected());
        assert!(state.connected_address().is_none());
        assert_eq!(state.last_error().unwrap().message, "popup closed");

        state.apply(SessionEvent::Loading);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_connected_implies_address() {
        let events = [
            SessionEvent::Loading,
            SessionEvent::ConnectFailed(ConnectionError::new("x")),
            SessionEvent::Connected { address: addr() },
            SessionEvent::Loading,
            SessionEvent::Disconnected,
            SessionEvent::Connected { address: addr() },
        ];
        let mut state = SessionState::default();
        for event in events {
            state.apply(event);
            assert!(!state.is_connected() || state.connected_address().is_some());
        }
    }
}
