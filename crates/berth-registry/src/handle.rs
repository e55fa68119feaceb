use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use berth_session::TerminalSession;

use crate::framework::GroupId;

/// The editor-tab object representing a terminal session within the tab
/// framework.
///
/// Created by the registry, displayed by the framework. The wrapped session
/// reference is cleared when the session detaches; disposal is a one-shot
/// flag so a tab-close arriving after an explicit detach never
/// double-disposes.
pub struct TabHandle {
    session: Mutex<Option<Arc<TerminalSession>>>,
    group: Mutex<Option<GroupId>>,
    disposed: AtomicBool,
}

impl TabHandle {
    pub fn new(session: Arc<TerminalSession>) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            group: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    /// The wrapped session, if still attached.
    pub fn session(&self) -> Option<Arc<TerminalSession>> {
        self.session.lock().ok().and_then(|s| s.clone())
    }

    /// Clear the wrapped session reference.
    pub fn detach_session(&self) {
        if let Ok(mut session) = self.session.lock() {
            *session = None;
        }
    }

    /// The tab group currently showing this tab, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.group.lock().ok().and_then(|g| *g)
    }

    /// Record the group the framework placed this tab in.
    pub fn set_group(&self, group: Option<GroupId>) {
        if let Ok(mut g) = self.group.lock() {
            *g = group;
        }
    }

    /// Release the tab. Returns `true` only for the call that took effect.
    pub fn dispose(&self) -> bool {
        let first = !self.disposed.swap(true, Ordering::SeqCst);
        if first {
            log::debug!("tab handle disposed");
        }
        first
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_session::{TargetKind, TerminalUri};

    fn handle() -> TabHandle {
        let session = Arc::new(TerminalSession::new(
            1,
            TerminalUri::new(1, 1),
            TargetKind::Editor,
        ));
        TabHandle::new(session)
    }

    #[test]
    fn test_detach_clears_session() {
        let h = handle();
        assert!(h.session().is_some());
        h.detach_session();
        assert!(h.session().is_none());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let h = handle();
        assert!(!h.is_disposed());
        assert!(h.dispose());
        assert!(!h.dispose());
        assert!(h.is_disposed());
    }

    #[test]
    fn test_group_assignment() {
        let h = handle();
        assert!(h.group().is_none());
        h.set_group(Some(3));
        assert_eq!(h.group(), Some(3));
        h.set_group(None);
        assert!(h.group().is_none());
    }
}
