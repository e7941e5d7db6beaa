//! fomtrace state - layout bookkeeping for a single trace pass
//!
//! Everything here is owned by one processing pass and mutated in input
//! order: the time axis, the lane pools and the registry of live tasks.

pub mod error;
pub mod lanes;
pub mod registry;
pub mod time_axis;

pub use error::*;
pub use lanes::{IoInterval, IoLanes, TaskLanes};
pub use registry::{PhaseChange, StateChange, Task, TaskRegistry, TaskState};
pub use time_axis::{Gridline, TimeAxis};
