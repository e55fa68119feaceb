use std::sync::Arc;

use crate::handle::TabHandle;

/// Identifier of a tab group within the framework.
pub type GroupId = u64;

/// Which group a tab opens into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetGroup {
    /// The currently active group.
    Active,
    /// A group beside the active one (split).
    Side,
}

/// Options for opening a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub pinned: bool,
    pub force_reload: bool,
}

/// What the framework currently shows as its active editor.
#[derive(Clone)]
pub enum ActiveEditor {
    Terminal(Arc<TabHandle>),
    /// Some other editor kind (text file, diff view, ...).
    Other,
}

/// Why a tab left the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The tab was closed outright.
    Closed,
    /// The tab was dragged to another group; the input moves with it.
    Moved,
}

/// The externally-owned editor-tab framework.
///
/// The registry never reaches past these accessors. The framework's
/// active-changed / visible-changed / closed notifications arrive as host
/// calls to [`TabRegistry::handle_active_tab_changed`],
/// [`TabRegistry::reattach_from_tab_framework`] and
/// [`TabRegistry::handle_tab_closed`].
///
/// [`TabRegistry::handle_active_tab_changed`]: crate::TabRegistry::handle_active_tab_changed
/// [`TabRegistry::reattach_from_tab_framework`]: crate::TabRegistry::reattach_from_tab_framework
/// [`TabRegistry::handle_tab_closed`]: crate::TabRegistry::handle_tab_closed
pub trait TabFramework {
    /// Open (or reveal) `handle` as a tab in the target group.
    fn open_editor(&self, handle: &Arc<TabHandle>, options: OpenOptions, target: TargetGroup);

    /// Bring a tab group to the front.
    fn activate_group(&self, group: GroupId);

    /// Terminal tabs currently visible across all groups.
    fn visible_terminal_tabs(&self) -> Vec<Arc<TabHandle>>;

    /// The editor the framework currently shows as active, if any.
    fn active_editor(&self) -> Option<ActiveEditor>;
}
