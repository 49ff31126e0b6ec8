use thiserror::Error;

/// Precondition failures reported by the engine's entry points.
///
/// Per-sample processing never fails; anything that could go wrong is
/// rejected when an instance is initialized or a processor is addressed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaperError {
    #[error("sample rate must be positive, finite and at most 1 MHz, got {0}")]
    InvalidSampleRate(f32),

    #[error("{name} = {value} is outside {min}..={max}")]
    ParamOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} is not a finite number")]
    NonFiniteParam { name: &'static str },

    #[error("batch processing used before initialization")]
    NotInitialized,

    #[error("no realtime processor at group {group} ({count} registered)")]
    UnknownProcessor { group: usize, count: usize },

    #[error("unknown curve type '{0}'")]
    UnknownCurveType(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, ShaperError>;
