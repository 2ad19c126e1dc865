//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired entries from every managed cache

mod cleanup;

pub use cleanup::spawn_cleanup_task;
