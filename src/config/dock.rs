use std::time::Duration;

use thiserror::Error;

/// Behaviour switches for the docking controller
///
/// Defaults reproduce the classic behaviour: every lifecycle event that breaks
/// a window's geometry (hide, maximize, close, losing a mesh child) undocks it,
/// and finishing a snap docks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockConfig {
    pub undock_on_hidden: bool,
    pub undock_on_maximize: bool,
    pub undock_on_close: bool,
    pub undock_on_child_remove: bool,
    pub dock_on_snap: bool,
    pub restore_group_on_restore: bool,
    mouse_poll_interval: Duration,
}

impl DockConfig {
    pub const DEFAULT_POLL_MS: u64 = 250;
    pub const MIN_POLL_MS: u64 = 16;
    pub const MAX_POLL_MS: u64 = 5_000;

    /// Interval at which the external timer should refresh mouse and monitor state
    pub fn mouse_poll_interval(&self) -> Duration {
        self.mouse_poll_interval
    }

    /// Sets the poll interval, rejecting values outside the supported range
    pub fn with_mouse_poll_interval(mut self, interval: Duration) -> Result<Self, DockConfigError> {
        let millis = interval.as_millis();
        if millis < u128::from(Self::MIN_POLL_MS) || millis > u128::from(Self::MAX_POLL_MS) {
            return Err(DockConfigError::PollIntervalOutOfRange {
                requested_ms: millis,
                min_ms: Self::MIN_POLL_MS,
                max_ms: Self::MAX_POLL_MS,
            });
        }
        self.mouse_poll_interval = interval;
        Ok(self)
    }

    /// Clamps a poll interval into the supported range
    pub fn sanitize_poll_interval(interval: Duration) -> Duration {
        interval.clamp(
            Duration::from_millis(Self::MIN_POLL_MS),
            Duration::from_millis(Self::MAX_POLL_MS),
        )
    }

    /// Configuration that never undocks or docks on lifecycle events
    ///
    /// Groups then change only through explicit `dock`/`undock` calls.
    pub fn manual() -> Self {
        Self {
            undock_on_hidden: false,
            undock_on_maximize: false,
            undock_on_close: false,
            undock_on_child_remove: false,
            dock_on_snap: false,
            restore_group_on_restore: false,
            ..Self::default()
        }
    }
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            undock_on_hidden: true,
            undock_on_maximize: true,
            undock_on_close: true,
            undock_on_child_remove: true,
            dock_on_snap: true,
            restore_group_on_restore: true,
            mouse_poll_interval: Duration::from_millis(Self::DEFAULT_POLL_MS),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DockConfigError {
    #[error("Mouse poll interval {requested_ms}ms is outside the supported range {min_ms}..={max_ms}ms")]
    PollIntervalOutOfRange {
        requested_ms: u128,
        min_ms: u64,
        max_ms: u64,
    },
}
