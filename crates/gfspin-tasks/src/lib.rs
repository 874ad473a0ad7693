//! # gfspin-tasks
//!
//! A small task substrate for the parallel seed searches.
//!
//! - [`ThreadPool`]: fixed number of workers on one FIFO queue, or inline
//!   execution when configured with zero threads
//! - [`TaskGroup`]: counts member tasks, fires a completion callback exactly
//!   once, and lets producers throttle on the number of pending tasks
//! - [`Task`]: a one-shot callback or a range-chunk callback

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod group;
pub mod pool;
pub mod task;

pub use group::TaskGroup;
pub use pool::{PoolConfig, ThreadPool};
pub use task::{RangeFn, Task};
