//! Window docking engine
//!
//! Windows whose edges touch can be docked into a group that then moves,
//! minimizes and restores as one unit. The crate is split into:
//! - `domain`: geometry (vectors, boxes, collision meshes)
//! - `platform`: monitors and window hosts
//! - `app`: dock groups, events and the controller
//! - `config`: behaviour switches

pub mod app;
pub mod config;
pub mod domain;
pub mod platform;
pub mod telemetry;
