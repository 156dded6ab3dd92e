//! Monitor snapshots and monitor queries
//!
//! This module is responsible for:
//! - Describing a physical display as a pair of rectangles (full and available)
//! - Answering "which monitor" questions against an immutable snapshot
//! - Enumerating the connected monitors on Windows
//!
//! The docking core never caches monitors; every grouped move receives the
//! current `MonitorSet` by reference.

use crate::domain::{BoundingBox, CollisionMesh, Intersection, Shape, Vector};

/// A physical display
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    /// Zero-based index for stable identification
    pub index: usize,
    /// Device name reported by the system
    pub name: String,
    /// Scale factor (1.0 = 96 DPI); recorded only, coordinates are not normalized
    pub device_scale_factor: f64,
    /// Full monitor rectangle
    pub monitor_rect: BoundingBox,
    /// Work area (excluding taskbar)
    pub available_rect: BoundingBox,
    /// Whether this is the primary monitor
    pub is_primary: bool,
}

impl Monitor {
    /// Creates a monitor whose work area equals its full rectangle
    pub fn new(index: usize, monitor_rect: BoundingBox) -> Self {
        Self {
            index,
            name: format!("monitor-{index}"),
            device_scale_factor: 1.0,
            monitor_rect,
            available_rect: monitor_rect,
            is_primary: index == 0,
        }
    }

    pub fn with_available_rect(mut self, available_rect: BoundingBox) -> Self {
        self.available_rect = available_rect;
        self
    }

    pub fn bounds(&self) -> BoundingBox {
        self.monitor_rect
    }

    pub fn is_contains(&self, other: &impl Shape) -> bool {
        self.monitor_rect.is_contains(other)
    }

    pub fn is_touching(&self, other: &impl Shape) -> bool {
        self.monitor_rect.is_touching(other)
    }

    pub fn is_colliding(&self, other: &impl Shape) -> bool {
        self.monitor_rect.is_colliding(other)
    }
}

impl Shape for Monitor {
    fn to_vector(&self) -> Vector {
        self.monitor_rect.position()
    }

    fn to_bounding_box(&self) -> BoundingBox {
        self.monitor_rect
    }

    fn to_collision_mesh(&self) -> CollisionMesh {
        CollisionMesh::from(self.monitor_rect)
    }
}

/// Error types for monitor operations
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to enumerate monitors")]
    EnumerationFailed,

    #[error("No monitors found during enumeration")]
    NoMonitors,

    #[error("Monitor not found at specified location")]
    MonitorNotFound,
}

/// Immutable snapshot of the connected monitors
///
/// The primary monitor is kept first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
}

impl MonitorSet {
    pub fn new(mut monitors: Vec<Monitor>) -> Self {
        // Stable: non-primary monitors keep their enumeration order
        monitors.sort_by_key(|m| !m.is_primary);
        Self { monitors }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// The primary monitor, or the first one if none is flagged primary
    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors.first()
    }

    /// First monitor fully containing `shape`
    pub fn determine_monitor(&self, shape: &impl Shape) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.is_contains(shape))
    }

    /// Monitor sharing the largest area with `shape`
    ///
    /// Ties go to the later monitor. Monitors meeting `shape` only along an edge
    /// are ignored.
    pub fn determine_partial_monitor(&self, shape: &impl Shape) -> Option<&Monitor> {
        let bounds = shape.to_bounding_box();
        let mut best: Option<(&Monitor, f64)> = None;

        for monitor in self.monitors.iter().filter(|m| m.is_colliding(&bounds)) {
            if let Some(Intersection::Area(overlap)) = bounds.intersection(monitor) {
                let area = overlap.area();
                if best.is_none_or(|(_, max)| area >= max) {
                    best = Some((monitor, area));
                }
            }
        }

        best.map(|(monitor, _)| monitor)
    }

    /// Returns true if any part of `shape` is on some monitor
    pub fn is_visible(&self, shape: &impl Shape) -> bool {
        shape.to_collision_mesh().some_colliding(&self.monitors)
    }

    /// Returns true if some monitor contains some box of `shape`
    pub fn is_contained(&self, shape: &impl Shape) -> bool {
        CollisionMesh::from_shapes(&self.monitors).is_contains(shape)
    }
}

#[cfg(windows)]
pub use self::win32::{enumerate_monitors, get_monitor_from_point};

#[cfg(windows)]
mod win32 {
    use super::{Monitor, MonitorError, MonitorSet};
    use crate::platform::windows::win32_rect_to_bounds;
    use windows::Win32::Foundation::*;
    use windows::Win32::Graphics::Gdi::*;
    use windows::Win32::UI::HiDpi::*;

    /// Context for monitor enumeration callback
    struct EnumContext {
        monitors: Vec<Monitor>,
        next_index: usize,
    }

    /// Callback function for monitor enumeration
    ///
    /// Monitors whose info cannot be read are skipped rather than aborting the
    /// whole enumeration.
    unsafe extern "system" fn enum_monitor_proc(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        lparam: LPARAM,
    ) -> BOOL {
        unsafe {
            let context = &mut *(lparam.0 as *mut EnumContext);

            let mut monitor_info = MONITORINFOEXW {
                monitorInfo: MONITORINFO {
                    cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
                    ..Default::default()
                },
                ..Default::default()
            };

            if GetMonitorInfoW(hmonitor, &mut monitor_info.monitorInfo) == FALSE {
                tracing::warn!(index = context.next_index, "skipping monitor without info");
                return TRUE;
            }

            let mut dpi_x: u32 = 96;
            let mut dpi_y: u32 = 96;
            if GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_err() {
                dpi_x = 96;
            }

            let name_len = monitor_info
                .szDevice
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(monitor_info.szDevice.len());
            let name = String::from_utf16_lossy(&monitor_info.szDevice[..name_len]);

            let monitor = Monitor {
                index: context.next_index,
                name,
                device_scale_factor: f64::from(dpi_x) / 96.0,
                monitor_rect: win32_rect_to_bounds(&monitor_info.monitorInfo.rcMonitor),
                available_rect: win32_rect_to_bounds(&monitor_info.monitorInfo.rcWork),
                is_primary: (monitor_info.monitorInfo.dwFlags & 1) != 0, // MONITORINFOF_PRIMARY
            };

            context.monitors.push(monitor);
            context.next_index += 1;

            TRUE
        }
    }

    /// Enumerates all monitors into a snapshot, primary first
    pub fn enumerate_monitors() -> Result<MonitorSet, MonitorError> {
        let mut context = EnumContext {
            monitors: Vec::new(),
            next_index: 0,
        };

        unsafe {
            if EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_proc),
                LPARAM(&mut context as *mut _ as isize),
            ) == FALSE
            {
                return Err(MonitorError::EnumerationFailed);
            }
        }

        if context.monitors.is_empty() {
            return Err(MonitorError::NoMonitors);
        }

        Ok(MonitorSet::new(context.monitors))
    }

    /// Gets the monitor containing the specified point
    pub fn get_monitor_from_point(left: f64, top: f64) -> Result<Monitor, MonitorError> {
        let monitors = enumerate_monitors()?;
        monitors
            .determine_monitor(&crate::domain::Vector::new(left, top))
            .cloned()
            .ok_or(MonitorError::MonitorNotFound)
    }
}
