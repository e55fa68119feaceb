use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

use berth_session::{
    BackendDescriptor, DetachBroker, EventStream, LaunchConfig, SessionEvent, SessionFactory,
    SessionSeed, TargetKind, TerminalSession, TerminalUri, WindowId,
};

use crate::error::RegistryError;
use crate::framework::{ActiveEditor, CloseReason, OpenOptions, TabFramework, TargetGroup};
use crate::handle::TabHandle;

/// The three shapes a caller can resolve a tab from.
pub enum ResolveSource {
    /// A virtual-document identity, possibly owned by another window.
    ByIdentity(TerminalUri),
    /// A live session reference.
    BySession(Arc<TerminalSession>),
    /// A backend process descriptor ready to reattach.
    ByBackendDescriptor(BackendDescriptor),
}

/// Outcome of a resolution.
pub enum Resolution {
    /// The identity is backed by a live session shown as this tab.
    Attached(Arc<TabHandle>),
    /// A cross-window detach request is in flight; re-resolve the same
    /// identity once the owning window has responded.
    Pending,
}

/// One tracked tab: the live session, its handle, and the session event
/// subscription that is released when the entry is removed.
struct RegistryEntry {
    session: Arc<TerminalSession>,
    handle: Arc<TabHandle>,
    events: UnboundedReceiver<SessionEvent>,
}

/// Tracks which terminal sessions are displayed as editor tabs.
///
/// Owns the identity maps, the ordered live-session list and the active
/// index, and publishes four notification streams (session-disposed,
/// session-focused, active-changed, list-changed). All operations take
/// `&mut self`; the host drives the registry from one place and feeds
/// framework notifications in as calls.
pub struct TabRegistry {
    window: WindowId,
    framework: Arc<dyn TabFramework>,
    factory: Arc<dyn SessionFactory>,
    broker: Arc<dyn DetachBroker>,
    /// Identity -> tracked tab.
    entries: HashMap<TerminalUri, RegistryEntry>,
    /// Identity -> launch configuration awaiting materialization.
    deferred: HashMap<TerminalUri, LaunchConfig>,
    /// Live sessions in tab order.
    sessions: Vec<Arc<TerminalSession>>,
    /// Index of the active session in `sessions`.
    active: Option<usize>,
    /// Outstanding cross-window detach requests.
    pending_detaches: Vec<(TerminalUri, oneshot::Receiver<BackendDescriptor>)>,
    shutting_down: bool,
    disposed_stream: EventStream<Arc<TerminalSession>>,
    focused_stream: EventStream<Arc<TerminalSession>>,
    active_changed: EventStream<Option<Arc<TerminalSession>>>,
    list_changed: EventStream<()>,
}

impl TabRegistry {
    pub fn new(
        window: WindowId,
        framework: Arc<dyn TabFramework>,
        factory: Arc<dyn SessionFactory>,
        broker: Arc<dyn DetachBroker>,
    ) -> Self {
        Self {
            window,
            framework,
            factory,
            broker,
            entries: HashMap::new(),
            deferred: HashMap::new(),
            sessions: Vec::new(),
            active: None,
            pending_detaches: Vec::new(),
            shutting_down: false,
            disposed_stream: EventStream::new(),
            focused_stream: EventStream::new(),
            active_changed: EventStream::new(),
            list_changed: EventStream::new(),
        }
    }

    /// Observe sessions disposing themselves.
    pub fn subscribe_session_disposed(&mut self) -> UnboundedReceiver<Arc<TerminalSession>> {
        self.disposed_stream.subscribe()
    }

    /// Observe sessions whose widget gained focus.
    pub fn subscribe_session_focused(&mut self) -> UnboundedReceiver<Arc<TerminalSession>> {
        self.focused_stream.subscribe()
    }

    /// Observe changes to the active selection. Carries the resolved
    /// current value, which may be `None`.
    pub fn subscribe_active_changed(
        &mut self,
    ) -> UnboundedReceiver<Option<Arc<TerminalSession>>> {
        self.active_changed.subscribe()
    }

    /// Observe additions to and removals from the live-session list.
    pub fn subscribe_list_changed(&mut self) -> UnboundedReceiver<()> {
        self.list_changed.subscribe()
    }

    /// Live sessions in tab order.
    pub fn sessions(&self) -> &[Arc<TerminalSession>] {
        &self.sessions
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active session, recomputed from the index and the current list.
    pub fn active_session(&self) -> Option<Arc<TerminalSession>> {
        self.active.and_then(|i| self.sessions.get(i)).cloned()
    }

    pub fn session_for_uri(&self, uri: &TerminalUri) -> Option<Arc<TerminalSession>> {
        self.entries.get(uri).map(|e| Arc::clone(&e.session))
    }

    pub fn handle_for_uri(&self, uri: &TerminalUri) -> Option<Arc<TabHandle>> {
        self.entries.get(uri).map(|e| Arc::clone(&e.handle))
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Flip the shutdown flag. Detaches from here on keep tab handles
    /// undisposed so teardown does not disturb the tab layout, while
    /// in-memory bookkeeping is still cleared.
    pub fn handle_will_shutdown(&mut self) {
        log::debug!("registry entering shutdown");
        self.shutting_down = true;
    }

    /// Resolve `source` to a tab handle, creating a session and tab if the
    /// identity is not yet tracked.
    ///
    /// Idempotent per identity: a second resolution returns the identical
    /// handle without firing notifications. A cross-window identity returns
    /// [`Resolution::Pending`] after asking the owning window to release
    /// the backend; the caller re-resolves once the response has arrived.
    pub fn resolve_or_create(
        &mut self,
        source: ResolveSource,
    ) -> Result<Resolution, RegistryError> {
        self.sweep_pending_detaches();

        let uri = match &source {
            ResolveSource::ByIdentity(uri) => uri.clone(),
            ResolveSource::BySession(session) => session.uri().clone(),
            ResolveSource::ByBackendDescriptor(desc) => desc.uri(),
        };

        if let Some(entry) = self.entries.get(&uri) {
            return Ok(Resolution::Attached(Arc::clone(&entry.handle)));
        }

        let session = match source {
            ResolveSource::BySession(session) => session,
            ResolveSource::ByBackendDescriptor(desc) => self.factory.create_session(
                SessionSeed::Reattach(desc),
                TargetKind::Editor,
                Some(uri.clone()),
            )?,
            ResolveSource::ByIdentity(_) => {
                if let Some(config) = self.deferred.remove(&uri) {
                    self.factory.create_session(
                        SessionSeed::Launch(config),
                        TargetKind::Editor,
                        Some(uri.clone()),
                    )?
                } else if uri.window() != self.window {
                    let rx = self.broker.request_detach(uri.window(), uri.instance());
                    log::debug!("requested detach of {uri} from its owning window");
                    self.pending_detaches.push((uri, rx));
                    return Ok(Resolution::Pending);
                } else {
                    return Err(RegistryError::Unresolved(uri));
                }
            }
        };

        let handle = Arc::new(TabHandle::new(Arc::clone(&session)));
        self.track(session, Arc::clone(&handle));
        Ok(Resolution::Attached(handle))
    }

    /// Open (or reveal) the tab for the resolved source, pinned and forced
    /// to reload. A `Pending` resolution passes through untouched.
    pub fn open(
        &mut self,
        source: ResolveSource,
        prefer_side_group: bool,
    ) -> Result<Resolution, RegistryError> {
        let resolution = self.resolve_or_create(source)?;
        if let Resolution::Attached(handle) = &resolution {
            match handle.group() {
                Some(group) => self.framework.activate_group(group),
                None => {
                    let target = if prefer_side_group {
                        TargetGroup::Side
                    } else {
                        TargetGroup::Active
                    };
                    self.framework.open_editor(
                        handle,
                        OpenOptions {
                            pinned: true,
                            force_reload: true,
                        },
                        target,
                    );
                }
            }
        }
        Ok(resolution)
    }

    /// Set the active selection. An unknown (or absent) session clears it.
    /// Every call fires active-changed with the resolved current value.
    pub fn set_active_session(&mut self, session: Option<&Arc<TerminalSession>>) {
        self.active = session.and_then(|s| self.position_of(s));
        let current = self.active_session();
        self.active_changed.emit(current);
    }

    /// Translate the framework's active-editor notification into the
    /// selection: a terminal tab with a live session becomes active,
    /// anything else clears the selection.
    pub fn handle_active_tab_changed(&mut self, editor: Option<ActiveEditor>) {
        match editor {
            Some(ActiveEditor::Terminal(handle)) => {
                let session = handle.session();
                self.set_active_session(session.as_ref());
            }
            _ => self.set_active_session(None),
        }
    }

    /// Remove all bookkeeping for `session`.
    ///
    /// The single cleanup path, also reached from the dispose notification
    /// and from tab-close. Unknown sessions are a silent no-op.
    pub fn detach(&mut self, session: &Arc<TerminalSession>) {
        self.remove_session(session, true);
    }

    /// Detach whatever terminal tab the framework shows as active and hand
    /// back its live session for re-homing.
    pub fn detach_active_tab(&mut self) -> Result<Arc<TerminalSession>, RegistryError> {
        let handle = match self.framework.active_editor() {
            Some(ActiveEditor::Terminal(handle)) => handle,
            _ => return Err(RegistryError::NotATerminalTab),
        };
        let session = handle.session().ok_or(RegistryError::SessionDetached)?;
        self.detach(&session);
        Ok(session)
    }

    /// Translate the framework's tab-closed notification. A tab dragged to
    /// another group ([`CloseReason::Moved`]) keeps its input alive; a real
    /// close disposes it (unless a prior detach already did).
    pub fn handle_tab_closed(&mut self, handle: &Arc<TabHandle>, reason: CloseReason) {
        let session = match handle.session() {
            Some(session) => session,
            None => {
                // Input already detached from its session; fall back to
                // handle identity so the entry still gets cleaned up.
                let found = self
                    .entries
                    .values()
                    .find(|e| Arc::ptr_eq(&e.handle, handle))
                    .map(|e| Arc::clone(&e.session));
                match found {
                    Some(session) => session,
                    None => return,
                }
            }
        };
        self.remove_session(&session, matches!(reason, CloseReason::Closed));
    }

    /// Reconcile with the framework after a visible-tabs change: adopt the
    /// one terminal tab the framework created out-of-band (e.g. via a
    /// split command), without a factory call. The framework adds at most
    /// one such tab per event; everything else visible is already tracked.
    pub fn reattach_from_tab_framework(&mut self) {
        let visible = self.framework.visible_terminal_tabs();
        let unknown = visible.into_iter().find(|handle| {
            handle
                .session()
                .is_some_and(|s| !self.entries.contains_key(s.uri()))
        });
        if let Some(handle) = unknown {
            if let Some(session) = handle.session() {
                log::debug!("adopting out-of-band terminal tab {}", session.uri());
                self.track(session, handle);
            }
        }
    }

    /// Bring the active session's tab group to the front without
    /// re-opening the tab.
    pub fn reveal_active_tab(&self) {
        let Some(session) = self.active_session() else {
            return;
        };
        if let Some(entry) = self.entries.get(session.uri()) {
            if let Some(group) = entry.handle.group() {
                self.framework.activate_group(group);
            }
        }
    }

    /// Drain session event subscriptions and forward them: focus to the
    /// focused stream, dispose to the disposed stream followed by
    /// detachment. Dispose notifications fire before the list-changed
    /// their detach causes.
    pub fn process_session_events(&mut self) {
        self.sweep_pending_detaches();

        let mut focused = Vec::new();
        let mut disposed = Vec::new();
        for entry in self.entries.values_mut() {
            loop {
                match entry.events.try_recv() {
                    Ok(SessionEvent::FocusGained) => focused.push(Arc::clone(&entry.session)),
                    Ok(SessionEvent::Disposed) => disposed.push(Arc::clone(&entry.session)),
                    Err(_) => break,
                }
            }
        }

        for session in focused {
            self.focused_stream.emit(session);
        }
        for session in disposed {
            self.disposed_stream.emit(Arc::clone(&session));
            self.remove_session(&session, true);
        }
    }

    /// Register a session + handle pair and fire list-changed.
    fn track(&mut self, session: Arc<TerminalSession>, handle: Arc<TabHandle>) {
        let uri = session.uri().clone();
        let events = session.subscribe();
        log::info!(
            "tracking terminal tab {uri} (total: {})",
            self.sessions.len() + 1
        );
        self.sessions.push(Arc::clone(&session));
        self.entries.insert(
            uri,
            RegistryEntry {
                session,
                handle,
                events,
            },
        );
        self.list_changed.emit(());
    }

    /// Fold completed cross-window detach responses into the deferred map.
    /// A dropped sender means the owning window refused or went away; the
    /// request is forgotten, never retried.
    fn sweep_pending_detaches(&mut self) {
        let mut completed = Vec::new();
        self.pending_detaches.retain_mut(|(uri, rx)| match rx.try_recv() {
            Ok(desc) => {
                completed.push((uri.clone(), desc));
                false
            }
            Err(oneshot::error::TryRecvError::Empty) => true,
            Err(oneshot::error::TryRecvError::Closed) => {
                log::warn!("detach request for {uri} was dropped by the owning window");
                false
            }
        });
        for (uri, desc) in completed {
            log::debug!("storing deferred launch config for {uri}");
            self.deferred.insert(uri, LaunchConfig::from(desc));
        }
    }

    fn position_of(&self, session: &Arc<TerminalSession>) -> Option<usize> {
        self.sessions.iter().position(|s| s.id() == session.id())
    }

    fn remove_session(&mut self, session: &Arc<TerminalSession>, dispose_handle: bool) {
        let uri = session.uri().clone();
        let Some(entry) = self.entries.remove(&uri) else {
            log::debug!("detach of untracked session {uri} ignored");
            return;
        };
        entry.handle.detach_session();
        self.deferred.remove(&uri);

        if let Some(idx) = self.position_of(session) {
            self.sessions.remove(idx);
            self.active = match self.active {
                Some(a) if a == idx => None,
                Some(a) if a > idx => Some(a - 1),
                other => other,
            };
        }

        if dispose_handle && !self.shutting_down && !entry.handle.is_disposed() {
            entry.handle.dispose();
        }

        // Dropping the entry releases its session event subscription.
        drop(entry);
        log::info!("detached terminal tab {uri} (total: {})", self.sessions.len());
        self.list_changed.emit(());
    }
}
