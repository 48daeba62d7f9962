//! Background Tasks Module
//!
//! Contains the periodic expiry sweep, started explicitly by the host.

mod sweep;

pub use sweep::{spawn_sweep_task, spawn_sweep_task_from_config, SweepHandle};
