use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::TargetKind;
use crate::events::EventStream;
use crate::uri::{SessionId, TerminalUri};

/// Events a session reports to whoever tracks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session's widget gained focus.
    FocusGained,
    /// The session disposed itself (backend exited or was torn down).
    Disposed,
}

/// A live terminal session wrapper with a numeric id and identity.
///
/// The registry references sessions, it does not own their backing
/// processes; those live behind the [`SessionFactory`](crate::SessionFactory)
/// seam. A session publishes focus and dispose events to its subscribers.
pub struct TerminalSession {
    id: SessionId,
    uri: TerminalUri,
    target: TargetKind,
    title: Mutex<Option<String>>,
    disposed: AtomicBool,
    events: Mutex<EventStream<SessionEvent>>,
}

impl TerminalSession {
    pub fn new(id: SessionId, uri: TerminalUri, target: TargetKind) -> Self {
        Self {
            id,
            uri,
            target,
            title: Mutex::new(None),
            disposed: AtomicBool::new(false),
            events: Mutex::new(EventStream::new()),
        }
    }

    /// The session's unique identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The virtual-document identity naming this session's tab.
    pub fn uri(&self) -> &TerminalUri {
        &self.uri
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// The current session title (set by the shell via escape sequences).
    pub fn title(&self) -> Option<String> {
        self.title.lock().ok().and_then(|t| t.clone())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if let Ok(mut t) = self.title.lock() {
            *t = Some(title.into());
        }
    }

    /// Subscribe to this session's focus/dispose events.
    pub fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        match self.events.lock() {
            Ok(mut events) => events.subscribe(),
            // Poisoned lock: hand back a receiver that never fires.
            Err(_) => EventStream::new().subscribe(),
        }
    }

    /// Report that the session's widget gained focus.
    pub fn notify_focus(&self) {
        if self.is_disposed() {
            return;
        }
        self.emit(SessionEvent::FocusGained);
    }

    /// Mark the session disposed and notify subscribers.
    ///
    /// Idempotent; only the first call emits.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("session {} disposed", self.uri);
        self.emit(SessionEvent::Disposed);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn emit(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.emit(event);
        }
    }
}
