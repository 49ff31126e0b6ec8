//! Per-channel processing and instance bookkeeping.
//!
//! `ProcessingInstance` is the unit of parallelism: one table, one DC
//! blocker, one refresh counter per audio channel. `InstanceManager` owns a
//! batch instance plus any number of realtime processors, and `message`
//! carries parameter snapshots into a realtime thread without locking.

pub mod instance;
pub mod manager;
pub mod message;

pub use instance::{ProcessingInstance, MAX_SAMPLE_RATE};
pub use manager::{InstanceManager, REALTIME_BLOCK_SIZE};
pub use message::{LiveParams, ParamsReceiver};

#[cfg(feature = "rtrb")]
pub use message::{params_channel, ParamsHandle};
