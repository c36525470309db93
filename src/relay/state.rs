use std::fmt;

/// Phase of the reconnect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayState {
    Connecting,
    Streaming,
    BackingOff,
    Terminated,
}

impl RelayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Connecting => "connecting",
            RelayState::Streaming => "streaming",
            RelayState::BackingOff => "backing_off",
            RelayState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the reconnect loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Shutdown was requested.
    Interrupted,
    /// The server ended the stream without an error.
    StreamClosed,
}
