pub mod scheduler;

pub use scheduler::{ScheduledAction, Scheduler};
