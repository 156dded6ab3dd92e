//! Window events and observers
//!
//! Lifecycle events flow into `DockController::handle_event`; the controller
//! acts on them and then forwards every event, together with the `Docked` and
//! `Undocked` notifications it produces itself, to the registered observers.

use crate::app::controller::WindowId;

/// Typed window event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Window was hidden
    Hidden,
    /// Window was maximized
    Maximized,
    /// Window was restored from minimized or maximized state
    Restored,
    /// Window was closed
    Closed,
    /// A child was detached from the window
    ChildRemoved { child: WindowId },
    /// A snap gesture ended, optionally against a specific window
    EndSnap { target: Option<WindowId> },
    /// Window was raised; its group should follow
    BringToFront,
    /// Window's children were raised; children of its peers should follow
    BringChildrenToFront,
    /// Window joined (or grew) a dock group
    Docked,
    /// Window's dock group was dissolved
    Undocked,
}

impl WindowEvent {
    /// Returns true for notifications produced by the controller itself
    pub fn is_notification(&self) -> bool {
        matches!(self, WindowEvent::Docked | WindowEvent::Undocked)
    }
}

/// Receiver of window events
///
/// Observers are called synchronously and get no access to the controller, so
/// they cannot mutate a group while it is being changed.
pub trait DockObserver {
    fn on_event(&mut self, window: WindowId, event: &WindowEvent);
}

impl<F> DockObserver for F
where
    F: FnMut(WindowId, &WindowEvent),
{
    fn on_event(&mut self, window: WindowId, event: &WindowEvent) {
        self(window, event)
    }
}
