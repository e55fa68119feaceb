use std::sync::Arc;

use tokio::sync::oneshot;

use crate::config::{BackendDescriptor, LaunchConfig, TargetKind};
use crate::session::TerminalSession;
use crate::uri::{SessionId, TerminalUri, WindowId};

/// What a session gets materialized from.
#[derive(Debug, Clone)]
pub enum SessionSeed {
    /// A launch configuration, possibly restored from a previous window.
    Launch(LaunchConfig),
    /// A backend process detached from its owning window.
    Reattach(BackendDescriptor),
}

/// Errors from session materialization.
#[derive(Debug)]
pub enum SessionError {
    SpawnFailed(String),
    AttachFailed(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::SpawnFailed(msg) => write!(f, "session spawn failed: {msg}"),
            SessionError::AttachFailed(msg) => write!(f, "session attach failed: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Creates live sessions from launch configurations or reattach descriptors.
///
/// Implemented by the terminal process backend. When `identity` is given,
/// the created session must carry it; otherwise the factory assigns a fresh
/// one in its own window.
pub trait SessionFactory {
    fn create_session(
        &self,
        seed: SessionSeed,
        target: TargetKind,
        identity: Option<TerminalUri>,
    ) -> Result<Arc<TerminalSession>, SessionError>;
}

/// The off-process backend owning terminal processes in other windows.
///
/// A detach request is made exactly once per resolution attempt; the
/// descriptor (or the drop of the sender, if the owning window refuses or
/// goes away) arrives on the returned receiver. There is no cancellation
/// path: a response that outlives the requester is simply ignored.
pub trait DetachBroker {
    fn request_detach(
        &self,
        owner: WindowId,
        session: SessionId,
    ) -> oneshot::Receiver<BackendDescriptor>;
}
