use berth_session::{SessionError, TerminalUri};

/// Errors from registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// No live session and no stored launch configuration for the identity.
    Unresolved(TerminalUri),
    /// The framework's active editor is not a terminal tab.
    NotATerminalTab,
    /// The tab's session reference was already detached.
    SessionDetached,
    /// The session factory failed to materialize a session.
    Factory(SessionError),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Unresolved(uri) => {
                write!(f, "no session or launch configuration for {uri}")
            }
            RegistryError::NotATerminalTab => write!(f, "active editor is not a terminal tab"),
            RegistryError::SessionDetached => write!(f, "tab's session is already detached"),
            RegistryError::Factory(err) => write!(f, "session factory error: {err}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Factory(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SessionError> for RegistryError {
    fn from(err: SessionError) -> Self {
        RegistryError::Factory(err)
    }
}
