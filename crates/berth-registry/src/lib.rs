//! berth-registry: the terminal-tab registry for Berth.
//!
//! Tracks which terminal sessions are displayed as editor tabs, maps each
//! session to its virtual-document identity, and keeps the active selection
//! in sync with the surrounding editor-tab framework. The framework itself
//! (tab groups, activation, drag/drop) is an external collaborator reached
//! through the [`TabFramework`] contract; its notifications are fed into
//! the registry as operations by the host.
//!
//! # Architecture
//!
//! - [`TabHandle`] — The editor-tab object wrapping a session.
//! - [`TabFramework`] — Contract for the externally-owned tab framework.
//! - [`TabRegistry`] — The registry: identity maps, ordered live list,
//!   active index, and the four notification streams.

pub mod error;
pub mod framework;
pub mod handle;
pub mod registry;

pub use error::RegistryError;
pub use framework::{ActiveEditor, CloseReason, GroupId, OpenOptions, TabFramework, TargetGroup};
pub use handle::TabHandle;
pub use registry::{Resolution, ResolveSource, TabRegistry};
