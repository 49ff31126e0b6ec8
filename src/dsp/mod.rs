//! Low-level primitives for table-based waveshaping.
//!
//! These components do no allocation after construction, so they are safe to
//! embed in per-channel instance state and drive from a realtime callback.
//! They stay focused on the signal math; table refresh, per-curve gain
//! staging and instance bookkeeping live in `engine`.

/// Transfer curve generators that fill lookup tables.
pub mod curves;
/// Rolling-average DC offset removal.
pub mod dc_block;
/// Lookup table storage and interpolated lookup.
pub mod table;

pub use dc_block::DcBlocker;
pub use table::LookupTable;
