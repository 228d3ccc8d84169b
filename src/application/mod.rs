pub mod poller;
pub mod scheduler;

pub use poller::PositionPoller;
pub use scheduler::{ScheduleHandle, Scheduler};
