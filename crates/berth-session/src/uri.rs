use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique identifier for a terminal session.
pub type SessionId = u64;

/// Identifier of the window (host process) that owns a session.
pub type WindowId = u64;

/// Errors from parsing a terminal URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    BadScheme(String),
    BadWindow(String),
    BadInstance(String),
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriError::BadScheme(s) => write!(f, "terminal URI must start with term://: {s}"),
            UriError::BadWindow(s) => write!(f, "terminal URI has no valid window segment: {s}"),
            UriError::BadInstance(s) => {
                write!(f, "terminal URI has no valid instance segment: {s}")
            }
        }
    }
}

impl std::error::Error for UriError {}

/// The virtual-document identity naming a terminal tab's backing document.
///
/// Rendered as `term://window{window}/{instance}`, e.g. `term://window1/5`.
/// The window segment names the host process that owns the backing session;
/// the instance segment is the session id within that window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminalUri {
    window: WindowId,
    instance: SessionId,
}

impl TerminalUri {
    pub fn new(window: WindowId, instance: SessionId) -> Self {
        Self { window, instance }
    }

    /// The window that owns the backing session.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The session id within the owning window.
    pub fn instance(&self) -> SessionId {
        self.instance
    }
}

impl fmt::Display for TerminalUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term://window{}/{}", self.window, self.instance)
    }
}

impl FromStr for TerminalUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, UriError> {
        let rest = s
            .strip_prefix("term://")
            .ok_or_else(|| UriError::BadScheme(s.to_string()))?;
        let (authority, instance) = rest
            .split_once('/')
            .ok_or_else(|| UriError::BadInstance(s.to_string()))?;
        let window = authority
            .strip_prefix("window")
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| UriError::BadWindow(s.to_string()))?;
        let instance = instance
            .parse()
            .map_err(|_| UriError::BadInstance(s.to_string()))?;
        Ok(Self { window, instance })
    }
}

// Serialized as the string form; the URI crosses the window boundary
// inside launch configurations.
impl Serialize for TerminalUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TerminalUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
