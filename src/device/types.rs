use std::fmt;

/// Connection state between this app and a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Scanning,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            ConnectionStatus::Idle => "idle",
            ConnectionStatus::Scanning => "scanning",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };

        write!(f, "{}", result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagInfo {
    // hex encoded, if the host exposes it
    pub uid: Option<String>,
}

/// Events delivered by a host while a scan is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Reading(TagInfo),
    ReadingError(String),
}

/// Result of `NfcController::write_color`. Only used for diagnostics, the
/// confirmation in the GUI plays regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    // no capability, or no scan session to write to
    Skipped,
    Failed(String),
}
