//! Real-world scenario benchmarks.
//!
//! These model a host driving the engine: steady parameters, a knob being
//! turned, and one processor per channel.

mod instance;
mod manager;

pub use instance::bench_instance;
pub use manager::bench_manager;
