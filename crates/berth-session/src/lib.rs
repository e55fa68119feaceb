//! berth-session: session model and collaborator contracts for Berth.
//!
//! This crate defines the terminal-session side of the tab registry: the
//! virtual-document identity that names a session, the session wrapper
//! itself, and the contracts implemented by the process backend
//! (materializing sessions, detaching them from other windows).
//!
//! # Architecture
//!
//! - [`TerminalUri`] — The virtual-document identity naming a terminal tab.
//! - [`TerminalSession`] — A live session wrapper with id, identity, title,
//!   and a focus/dispose event source.
//! - [`SessionFactory`] / [`DetachBroker`] — Contracts for the process
//!   backend; the registry never spawns or owns OS processes itself.
//! - [`EventStream`] — Observer registration used for every notification
//!   stream in the workspace.

pub mod config;
pub mod events;
pub mod factory;
pub mod session;
pub mod uri;

pub use config::{AttachInfo, BackendDescriptor, LaunchConfig, TargetKind};
pub use events::EventStream;
pub use factory::{DetachBroker, SessionError, SessionFactory, SessionSeed};
pub use session::{SessionEvent, TerminalSession};
pub use uri::{SessionId, TerminalUri, UriError, WindowId};
