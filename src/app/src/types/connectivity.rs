use serde::{Deserialize, Serialize};

/// Link state shown in the header indicator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Nothing has completed yet.
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Checking => "Connecting...",
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Offline",
        }
    }

    pub fn from_outcome<T, E>(outcome: &Result<T, E>) -> Self {
        if outcome.is_ok() {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        }
    }
}
