use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::uri::{SessionId, TerminalUri, WindowId};

/// Where a session's tab lives in the surrounding editor framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Shown as an editor tab (the registry's domain).
    Editor,
    /// Shown in the terminal panel.
    Panel,
}

/// Attach parameters for an already-running backend process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachInfo {
    /// OS pid of the backend process to attach to.
    pub backend_pid: u32,
    pub title: Option<String>,
}

/// Parameters needed to materialize or reattach a session.
///
/// A launch configuration may have been serialized by a previous window
/// (tab restore) or built from a [`BackendDescriptor`] after a cross-window
/// detach completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Present when the config reattaches an existing backend process.
    pub attach: Option<AttachInfo>,
    /// Shell to launch when not attaching.
    pub shell: Option<String>,
    pub cwd: Option<PathBuf>,
    pub title: Option<String>,
    pub target: TargetKind,
}

/// Descriptor of a backend process the owning window has released.
///
/// Produced by the off-process backend in response to a detach request;
/// carries everything the session factory needs to reattach, plus the
/// identity the reattached session keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    pub owner_window: WindowId,
    pub session_id: SessionId,
    pub attach: AttachInfo,
    pub cwd: Option<PathBuf>,
}

impl BackendDescriptor {
    /// The identity the reattached session will carry.
    ///
    /// Identity is stable across the detach: the session keeps the URI it
    /// had in its original window.
    pub fn uri(&self) -> TerminalUri {
        TerminalUri::new(self.owner_window, self.session_id)
    }
}

impl From<BackendDescriptor> for LaunchConfig {
    fn from(desc: BackendDescriptor) -> Self {
        Self {
            title: desc.attach.title.clone(),
            attach: Some(desc.attach),
            shell: None,
            cwd: desc.cwd,
            target: TargetKind::Editor,
        }
    }
}
