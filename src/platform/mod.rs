//! Platform collaborators
//!
//! This module encapsulates the external capabilities the docking core drives:
//! monitor snapshots and per-window hosts. Win32 implementations are compiled
//! on Windows only; `VirtualWindow` works everywhere.

pub mod monitors;
pub mod window;
#[cfg(windows)]
pub mod windows;
