//! Connection status of the telemetry feed.

use std::fmt;

/// Whether the streaming session is currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// Map a transport status string onto a connection status.
    ///
    /// Any status starting with `CONNECTED` counts as connected and only the
    /// exact `DISCONNECTED` status counts as disconnected. Everything else
    /// (`CONNECTING`, `STALLED`, `DISCONNECTED:WILL-RETRY`, ...) yields `None`
    /// and leaves the current status untouched.
    #[must_use]
    pub fn from_transport(status: &str) -> Option<Self> {
        if status.starts_with("CONNECTED") {
            Some(Self::Connected)
        } else if status == "DISCONNECTED" {
            Some(Self::Disconnected)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_prefix_is_connected() {
        assert_eq!(
            ConnectionStatus::from_transport("CONNECTED:WS-STREAMING"),
            Some(ConnectionStatus::Connected)
        );
        assert_eq!(
            ConnectionStatus::from_transport("CONNECTED:STREAM-SENSING"),
            Some(ConnectionStatus::Connected)
        );
    }

    #[test]
    fn only_exact_disconnected_is_disconnected() {
        assert_eq!(
            ConnectionStatus::from_transport("DISCONNECTED"),
            Some(ConnectionStatus::Disconnected)
        );
        assert_eq!(ConnectionStatus::from_transport("DISCONNECTED:WILL-RETRY"), None);
    }

    #[test]
    fn other_statuses_are_ignored() {
        assert_eq!(ConnectionStatus::from_transport("CONNECTING"), None);
        assert_eq!(ConnectionStatus::from_transport("STALLED"), None);
        assert_eq!(ConnectionStatus::from_transport(""), None);
    }

    #[test]
    fn default_is_disconnected() {
        assert!(!ConnectionStatus::default().is_connected());
        assert_eq!(ConnectionStatus::Connected.to_string(), "Connected");
    }
}
