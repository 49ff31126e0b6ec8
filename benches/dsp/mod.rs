//! Benchmarks for low-level DSP primitives.

mod curves;
mod dc_block;
mod table;

pub use curves::bench_curves;
pub use dc_block::bench_dc_block;
pub use table::bench_table;
