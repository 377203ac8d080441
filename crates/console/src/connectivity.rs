//! Online/offline tracking driven by fetch results.

use haulbook_client::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectivityState {
    /// The last request reached the API (whatever it answered).
    #[default]
    Online,
    /// The last request failed in transport.
    Offline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    state: ConnectivityState,
    last_error: Option<String>,
}

impl Connectivity {
    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn is_offline(&self) -> bool {
        self.state == ConnectivityState::Offline
    }

    /// Transport error that put us offline, if we are.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_offline(&mut self, reason: impl Into<String>) {
        if !self.is_offline() {
            tracing::warn!("api unreachable; marking offline");
        }
        self.state = ConnectivityState::Offline;
        self.last_error = Some(reason.into());
    }

    pub fn set_online(&mut self) {
        if self.is_offline() {
            tracing::info!("api reachable again");
        }
        self.state = ConnectivityState::Online;
        self.last_error = None;
    }

    /// Update from a request result. Only transport failures count as
    /// offline; an API error still proves the server is reachable.
    pub fn observe<T>(&mut self, result: &ClientResult<T>) {
        match result {
            Err(err @ ClientError::Network(_)) => self.set_offline(err.to_string()),
            Err(ClientError::Validation(_)) => {}
            _ => self.set_online(),
        }
    }
}
