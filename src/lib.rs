pub mod dsp; // Curve tables, lookup and DC blocking
pub mod engine; // Per-channel instances and the instance manager
pub mod error;
pub mod params;
pub mod presets;

pub use engine::{InstanceManager, ProcessingInstance};
pub use error::{Result, ShaperError};
pub use params::{CurveType, Params};

/// Table resolution per unit of amplitude.
pub const STEPS: usize = 1024;
/// Number of entries in a lookup table, covering inputs -1.0..=1.0.
pub const TABLE_SIZE: usize = 2 * STEPS + 1;
/// Samples between table rebuilds while parameters are moving.
pub const SKIP_SAMPLES: usize = 1000;
pub const MAX_BLOCK_SIZE: usize = 2048;
