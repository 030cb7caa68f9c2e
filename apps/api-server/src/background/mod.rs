//! Background jobs.

mod cleanup;
mod scheduler;

pub use cleanup::spawn_orphan_sweep;
pub use scheduler::{Scheduler, SchedulerConfig};
