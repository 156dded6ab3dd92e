//! Window hosts
//!
//! This module handles:
//! - The `WindowHost` capability the docking core calls into
//! - An in-memory host (`VirtualWindow`) for headless use and tests
//! - A Win32 host moving real top-level windows
//!
//! Hosts only ever perform primitive, single-window operations. Anything that
//! acts on a whole dock group lives in `app::controller`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::domain::{BoundingBox, Vector};

/// Error types for window operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    #[error("Window is not ready")]
    NotReady,

    #[error("Invalid window handle {0:#x}")]
    InvalidHandle(isize),

    #[error("Failed to get info for window {0:#x}")]
    InfoFailed(isize),

    #[error("Failed to position window at ({left}, {top})")]
    PositionFailed { left: f64, top: f64 },

    #[error("Window command '{0}' failed")]
    CommandFailed(&'static str),
}

/// Primitive operations on a single native window
pub trait WindowHost: fmt::Debug {
    /// Current outer bounds; fails if the window is not initialized yet
    fn bounds(&self) -> Result<BoundingBox, WindowError>;

    /// Current top-left corner
    fn position(&self) -> Result<Vector, WindowError> {
        Ok(self.bounds()?.position())
    }

    /// Moves the window without resizing it
    fn move_to(&mut self, left: f64, top: f64) -> Result<(), WindowError>;

    fn minimize(&mut self) -> Result<(), WindowError>;

    fn restore(&mut self) -> Result<(), WindowError>;

    fn bring_to_front(&mut self) -> Result<(), WindowError>;

    fn focus(&mut self) -> Result<(), WindowError>;

    fn is_visible(&self) -> bool;

    fn is_minimized(&self) -> bool;

    fn is_focused(&self) -> bool;
}

/// Shared log of host calls, in call order
pub type HostJournal = Rc<RefCell<Vec<String>>>;

/// In-memory window
///
/// Behaves like a well-mannered native window: moves always succeed unless
/// configured otherwise, and bounds are unavailable until the window is ready.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    label: String,
    bounds: Option<BoundingBox>,
    visible: bool,
    minimized: bool,
    focused: bool,
    fail_moves: bool,
    fail_commands: bool,
    journal: Option<HostJournal>,
}

impl VirtualWindow {
    /// Creates a visible, ready window
    pub fn new(label: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bounds: Some(bounds),
            visible: true,
            minimized: false,
            focused: false,
            fail_moves: false,
            fail_commands: false,
            journal: None,
        }
    }

    /// Creates a window whose bounds are not available yet
    pub fn unready(label: impl Into<String>) -> Self {
        Self {
            bounds: None,
            ..Self::new(label, BoundingBox::default())
        }
    }

    /// Records every state-changing call into `journal`
    pub fn with_journal(mut self, journal: HostJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Makes every move fail, as a window the OS refuses to move
    pub fn with_failing_moves(mut self) -> Self {
        self.fail_moves = true;
        self
    }

    /// Makes minimize, restore, raise and focus fail
    pub fn with_failing_commands(mut self) -> Self {
        self.fail_commands = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn command(&self, name: &'static str) -> Result<(), WindowError> {
        if self.fail_commands {
            return Err(WindowError::CommandFailed(name));
        }
        self.record(name);
        Ok(())
    }

    fn record(&self, call: &str) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(format!("{}:{}", self.label, call));
        }
    }
}

impl WindowHost for VirtualWindow {
    fn bounds(&self) -> Result<BoundingBox, WindowError> {
        self.bounds.ok_or(WindowError::NotReady)
    }

    fn move_to(&mut self, left: f64, top: f64) -> Result<(), WindowError> {
        let bounds = self.bounds.as_mut().ok_or(WindowError::NotReady)?;
        if self.fail_moves {
            return Err(WindowError::PositionFailed { left, top });
        }
        bounds.move_to(Some(left), Some(top));
        self.record("move");
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), WindowError> {
        self.command("minimize")?;
        self.minimized = true;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), WindowError> {
        self.command("restore")?;
        self.minimized = false;
        Ok(())
    }

    fn bring_to_front(&mut self) -> Result<(), WindowError> {
        self.command("bring_to_front")?;
        self.visible = true;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), WindowError> {
        self.command("focus")?;
        self.focused = true;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

#[cfg(windows)]
pub use self::win32::{Win32Window, get_active_window};

#[cfg(windows)]
mod win32 {
    use super::{WindowError, WindowHost};
    use crate::domain::BoundingBox;
    use crate::platform::windows::win32_rect_to_bounds;
    use windows::Win32::Foundation::*;
    use windows::Win32::UI::WindowsAndMessaging::*;

    /// Top-level Win32 window
    ///
    /// Moves preserve size and Z-order and never activate the window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Win32Window {
        hwnd: HWND,
    }

    impl Win32Window {
        pub fn new(hwnd: HWND) -> Result<Self, WindowError> {
            let window = Self { hwnd };
            window.validate()?;
            Ok(window)
        }

        pub fn handle(&self) -> HWND {
            self.hwnd
        }

        fn validate(&self) -> Result<(), WindowError> {
            if unsafe { IsWindow(self.hwnd) }.as_bool() {
                Ok(())
            } else {
                Err(WindowError::InvalidHandle(self.hwnd.0))
            }
        }
    }

    /// Gets the currently active (foreground) window
    pub fn get_active_window() -> Result<Win32Window, WindowError> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0 == 0 {
            return Err(WindowError::NotReady);
        }
        Win32Window::new(hwnd)
    }

    impl WindowHost for Win32Window {
        fn bounds(&self) -> Result<BoundingBox, WindowError> {
            self.validate()?;
            let mut rect = RECT::default();
            let result = unsafe { GetWindowRect(self.hwnd, &mut rect) };
            result.map_err(|_| WindowError::InfoFailed(self.hwnd.0))?;
            Ok(win32_rect_to_bounds(&rect))
        }

        fn move_to(&mut self, left: f64, top: f64) -> Result<(), WindowError> {
            self.validate()?;
            // SWP_NOSIZE: keep the current size (width/height ignored)
            let result = unsafe {
                SetWindowPos(
                    self.hwnd,
                    HWND(0),
                    left.round() as i32,
                    top.round() as i32,
                    0,
                    0,
                    SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
                )
            };
            result.map_err(|_| WindowError::PositionFailed { left, top })
        }

        fn minimize(&mut self) -> Result<(), WindowError> {
            self.validate()?;
            // ShowWindow reports previous visibility, not success
            let _ = unsafe { ShowWindow(self.hwnd, SW_MINIMIZE) };
            Ok(())
        }

        fn restore(&mut self) -> Result<(), WindowError> {
            self.validate()?;
            let _ = unsafe { ShowWindow(self.hwnd, SW_RESTORE) };
            Ok(())
        }

        fn bring_to_front(&mut self) -> Result<(), WindowError> {
            self.validate()?;
            let result = unsafe {
                SetWindowPos(
                    self.hwnd,
                    HWND_TOP,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
                )
            };
            result.map_err(|_| WindowError::CommandFailed("bring_to_front"))
        }

        fn focus(&mut self) -> Result<(), WindowError> {
            self.validate()?;
            if unsafe { SetForegroundWindow(self.hwnd) }.as_bool() {
                Ok(())
            } else {
                Err(WindowError::CommandFailed("focus"))
            }
        }

        fn is_visible(&self) -> bool {
            let visible = unsafe { IsWindowVisible(self.hwnd) };
            visible.as_bool()
        }

        fn is_minimized(&self) -> bool {
            let iconic = unsafe { IsIconic(self.hwnd) };
            iconic.as_bool()
        }

        fn is_focused(&self) -> bool {
            let foreground = unsafe { GetForegroundWindow() };
            foreground == self.hwnd
        }
    }
}
