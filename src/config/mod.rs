//! Configuration module for dock-win
//!
//! Concentrates the settings that decide how lifecycle events feed the
//! docking controller and how often desktop state is refreshed.

pub mod dock;

pub use dock::{DockConfig, DockConfigError};
