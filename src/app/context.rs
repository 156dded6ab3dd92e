//! Desktop context
//!
//! Snapshot of the desktop the docking controller works against: the monitor
//! layout and the mouse position. An external timer refreshes it every
//! `DockConfig::mouse_poll_interval`; grouped moves borrow its monitor set.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::DockConfig;
use crate::domain::Vector;
use crate::platform::monitors::{Monitor, MonitorSet};

/// Monitor layout and mouse state
#[derive(Debug, Clone)]
pub struct DesktopContext {
    monitors: MonitorSet,
    mouse_position: Vector,
    mouse_monitor: Option<usize>,
    poll_interval: Duration,
    last_refresh: Option<Instant>,
}

impl DesktopContext {
    pub fn new(config: &DockConfig) -> Self {
        Self {
            monitors: MonitorSet::default(),
            mouse_position: Vector::default(),
            mouse_monitor: None,
            poll_interval: config.mouse_poll_interval(),
            last_refresh: None,
        }
    }

    /// True once a monitor layout has been loaded
    pub fn is_ready(&self) -> bool {
        !self.monitors.is_empty()
    }

    pub fn monitors(&self) -> &MonitorSet {
        &self.monitors
    }

    pub fn mouse_position(&self) -> Vector {
        self.mouse_position
    }

    /// Monitor under the mouse, falling back to the primary monitor
    pub fn mouse_monitor(&self) -> Option<&Monitor> {
        self.mouse_monitor
            .and_then(|index| self.monitors.monitors().get(index))
            .or_else(|| self.monitors.primary())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// True when the snapshot is older than the poll interval (or was never taken)
    pub fn is_stale(&self) -> bool {
        self.last_refresh
            .is_none_or(|refreshed| refreshed.elapsed() >= self.poll_interval)
    }

    /// Replaces the monitor layout
    pub fn update_monitors(&mut self, monitors: MonitorSet) {
        if monitors != self.monitors {
            info!(count = monitors.len(), "monitor layout changed");
        }
        self.monitors = monitors;
        self.mouse_monitor = self.locate_mouse();
        self.last_refresh = Some(Instant::now());
    }

    /// Records a new mouse position and the monitor it is on
    pub fn update_mouse_position(&mut self, position: Vector) {
        self.mouse_position = position;
        let monitor = self.locate_mouse();
        if monitor != self.mouse_monitor {
            debug!(from = ?self.mouse_monitor, to = ?monitor, "mouse changed monitor");
        }
        self.mouse_monitor = monitor;
        self.last_refresh = Some(Instant::now());
    }

    fn locate_mouse(&self) -> Option<usize> {
        self.monitors
            .monitors()
            .iter()
            .position(|monitor| monitor.bounds().is_contains(&self.mouse_position))
    }
}

#[cfg(windows)]
mod win32 {
    use super::DesktopContext;
    use crate::domain::Vector;
    use crate::platform::monitors::{MonitorError, enumerate_monitors};
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    impl DesktopContext {
        /// Reloads monitors and mouse position from the system
        pub fn refresh_from_system(&mut self) -> Result<(), MonitorError> {
            self.update_monitors(enumerate_monitors()?);
            let mut point = POINT::default();
            if unsafe { GetCursorPos(&mut point) }.is_ok() {
                self.update_mouse_position(Vector::new(f64::from(point.x), f64::from(point.y)));
            }
            Ok(())
        }
    }
}
