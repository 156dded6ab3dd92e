//! Application orchestration layer
//!
//! This module owns the docking state: registered windows, dock groups, the
//! events that change them and the desktop snapshot moves are validated
//! against.

pub mod context;
pub mod controller;
pub mod events;
pub mod groups;

pub use context::DesktopContext;
pub use controller::{ChildOptions, DockController, DockError, MeshOptions, MoveOutcome, WindowId};
pub use events::{DockObserver, WindowEvent};
pub use groups::GroupId;
