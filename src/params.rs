#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ShaperError};

/*
Parameter Set
=============

Seven user-facing values drive the engine. The UI / automation layer owns
them and hands the engine a read-only snapshot on every call.

| field          | domain       | default | meaning                            |
| -------------- | ------------ | ------- | ---------------------------------- |
| curve_type     | 11 variants  | HardClip| which transfer curve to build      |
| dc_block       | bool         | false   | run the rolling-average DC blocker |
| threshold_db   | -100 ..= 0   | -6      | clipping / limiting level          |
| noise_floor_db | -80 ..= -20  | -70     | leveller's lowest breakpoint       |
| param1         | 0 ..= 100    | 50      | per-curve (drive, hardness, ...)   |
| param2         | 0 ..= 100    | 50      | per-curve (makeup, level, ...)     |
| repeats        | 0 ..= 5      | 1       | extra passes for iterative curves  |

The engine assumes every field is in its domain. `validate()` is how the
entry points check that, `clamped()` is how a UI layer gets there.
*/

/// Inclusive domain and default of one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamRange {
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn check(&self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ShaperError::NonFiniteParam { name: self.name });
        }
        if value < self.min || value > self.max {
            return Err(ShaperError::ParamOutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

pub const THRESHOLD_DB: ParamRange = ParamRange {
    name: "threshold_db",
    min: -100.0,
    max: 0.0,
    default: -6.0,
};

pub const NOISE_FLOOR_DB: ParamRange = ParamRange {
    name: "noise_floor_db",
    min: -80.0,
    max: -20.0,
    default: -70.0,
};

pub const PARAM1: ParamRange = ParamRange {
    name: "param1",
    min: 0.0,
    max: 100.0,
    default: 50.0,
};

pub const PARAM2: ParamRange = ParamRange {
    name: "param2",
    min: 0.0,
    max: 100.0,
    default: 50.0,
};

pub const MAX_REPEATS: u32 = 5;
pub const DEFAULT_REPEATS: u32 = 1;

/// Linear equivalent of the lowest threshold, -100 dB.
pub const MIN_THRESHOLD_LINEAR: f64 = 1.0e-5;

#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * linear.log10()
}

/// The eleven transfer curves the engine can build.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CurveType {
    #[default]
    HardClip,
    SoftClip,
    HalfSin,
    Exponential,
    Logarithmic,
    Cubic,
    EvenHarmonics,
    Sine,
    Leveller,
    Rectifier,
    HardLimiter,
}

impl CurveType {
    pub const ALL: [CurveType; 11] = [
        CurveType::HardClip,
        CurveType::SoftClip,
        CurveType::HalfSin,
        CurveType::Exponential,
        CurveType::Logarithmic,
        CurveType::Cubic,
        CurveType::EvenHarmonics,
        CurveType::Sine,
        CurveType::Leveller,
        CurveType::Rectifier,
        CurveType::HardLimiter,
    ];

    /// Human-readable name shown in a curve selector.
    pub fn label(self) -> &'static str {
        match self {
            CurveType::HardClip => "Hard Clipping",
            CurveType::SoftClip => "Soft Clipping",
            CurveType::HalfSin => "Soft Overdrive",
            CurveType::Exponential => "Medium Overdrive",
            CurveType::Logarithmic => "Hard Overdrive",
            CurveType::Cubic => "Cubic Curve (odd harmonics)",
            CurveType::EvenHarmonics => "Even Harmonics",
            CurveType::Sine => "Expand and Compress",
            CurveType::Leveller => "Leveller",
            CurveType::Rectifier => "Rectifier Distortion",
            CurveType::HardLimiter => "Hard Limiter 1413",
        }
    }

    /// Stable kebab-case key, accepted back by `FromStr`.
    pub fn key(self) -> &'static str {
        match self {
            CurveType::HardClip => "hard-clip",
            CurveType::SoftClip => "soft-clip",
            CurveType::HalfSin => "half-sin",
            CurveType::Exponential => "exponential",
            CurveType::Logarithmic => "logarithmic",
            CurveType::Cubic => "cubic",
            CurveType::EvenHarmonics => "even-harmonics",
            CurveType::Sine => "sine",
            CurveType::Leveller => "leveller",
            CurveType::Rectifier => "rectifier",
            CurveType::HardLimiter => "hard-limiter",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next curve in selector order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the table is built from its positive half and mirrored.
    pub fn is_mirrored(self) -> bool {
        !matches!(
            self,
            CurveType::HardClip
                | CurveType::Cubic
                | CurveType::EvenHarmonics
                | CurveType::Rectifier
                | CurveType::HardLimiter
        )
    }

    /// Which controls this curve reads, and what they mean for it.
    pub fn controls(self) -> CurveControls {
        let base = CurveControls::default();
        match self {
            CurveType::HardClip => CurveControls {
                threshold: Some("Clipping level"),
                param1: Some("Drive"),
                param2: Some("Make-up Gain"),
                ..base
            },
            CurveType::SoftClip => CurveControls {
                threshold: Some("Clipping threshold"),
                param1: Some("Hardness"),
                param2: Some("Make-up Gain"),
                ..base
            },
            CurveType::HalfSin
            | CurveType::Exponential
            | CurveType::Logarithmic
            | CurveType::Sine => CurveControls {
                param1: Some("Distortion amount"),
                param2: Some("Output level"),
                ..base
            },
            CurveType::Cubic => CurveControls {
                param1: Some("Distortion amount"),
                repeats: Some("Repeat processing"),
                ..base
            },
            CurveType::EvenHarmonics => CurveControls {
                param1: Some("Distortion amount"),
                param2: Some("Harmonic brightness"),
                dc_block: true,
                ..base
            },
            CurveType::Leveller => CurveControls {
                noise_floor: Some("Noise Floor"),
                param1: Some("Levelling fine adjustment"),
                repeats: Some("Degree of Levelling"),
                ..base
            },
            CurveType::Rectifier => CurveControls {
                param1: Some("Distortion amount"),
                dc_block: true,
                ..base
            },
            CurveType::HardLimiter => CurveControls {
                threshold: Some("dB Limit"),
                param1: Some("Wet level"),
                param2: Some("Residual level"),
                ..base
            },
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CurveType {
    type Err = ShaperError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ShaperError::UnknownCurveType(s.to_string()))
    }
}

/// Labels for the controls a curve uses. `None` means the control is unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurveControls {
    pub threshold: Option<&'static str>,
    pub noise_floor: Option<&'static str>,
    pub param1: Option<&'static str>,
    pub param2: Option<&'static str>,
    pub repeats: Option<&'static str>,
    /// DC blocking is only offered for curves that introduce an offset.
    pub dc_block: bool,
}

/// Snapshot of the user-controlled values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub curve_type: CurveType,
    pub dc_block: bool,
    pub threshold_db: f64,
    pub noise_floor_db: f64,
    pub param1: f64,
    pub param2: f64,
    pub repeats: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            curve_type: CurveType::HardClip,
            dc_block: false,
            threshold_db: THRESHOLD_DB.default,
            noise_floor_db: NOISE_FLOOR_DB.default,
            param1: PARAM1.default,
            param2: PARAM2.default,
            repeats: DEFAULT_REPEATS,
        }
    }
}

impl Params {
    pub fn new(curve_type: CurveType) -> Self {
        Self {
            curve_type,
            ..Self::default()
        }
    }

    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    pub fn with_noise_floor_db(mut self, noise_floor_db: f64) -> Self {
        self.noise_floor_db = noise_floor_db;
        self
    }

    pub fn with_param1(mut self, param1: f64) -> Self {
        self.param1 = param1;
        self
    }

    pub fn with_param2(mut self, param2: f64) -> Self {
        self.param2 = param2;
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_dc_block(mut self, dc_block: bool) -> Self {
        self.dc_block = dc_block;
        self
    }

    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<()> {
        THRESHOLD_DB.check(self.threshold_db)?;
        NOISE_FLOOR_DB.check(self.noise_floor_db)?;
        PARAM1.check(self.param1)?;
        PARAM2.check(self.param2)?;
        if self.repeats > MAX_REPEATS {
            return Err(ShaperError::ParamOutOfRange {
                name: "repeats",
                value: self.repeats as f64,
                min: 0.0,
                max: MAX_REPEATS as f64,
            });
        }
        Ok(())
    }

    /// Copy with every field forced into its domain (NaN falls back to the default).
    pub fn clamped(&self) -> Self {
        Self {
            curve_type: self.curve_type,
            dc_block: self.dc_block,
            threshold_db: THRESHOLD_DB.clamp(self.threshold_db),
            noise_floor_db: NOISE_FLOOR_DB.clamp(self.noise_floor_db),
            param1: PARAM1.clamp(self.param1),
            param2: PARAM2.clamp(self.param2),
            repeats: self.repeats.min(MAX_REPEATS),
        }
    }

    /// Clipping level as linear amplitude, never below -100 dB.
    #[inline]
    pub fn threshold_linear(&self) -> f64 {
        db_to_linear(self.threshold_db).max(MIN_THRESHOLD_LINEAR)
    }

    #[inline]
    pub fn noise_floor_linear(&self) -> f64 {
        db_to_linear(self.noise_floor_db)
    }

    /// True when both snapshots would build the same table.
    ///
    /// `dc_block` is not part of the table and is ignored.
    pub fn same_table(&self, other: &Params) -> bool {
        self.curve_type == other.curve_type
            && self.threshold_db == other.threshold_db
            && self.noise_floor_db == other.noise_floor_db
            && self.param1 == other.param1
            && self.param2 == other.param2
            && self.repeats == other.repeats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = Params::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.curve_type, CurveType::HardClip);
        assert!((params.threshold_db + 6.0).abs() < 1e-12);
        assert_eq!(params.repeats, 1);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let params = Params::default().with_param1(120.0);
        match params.validate() {
            Err(ShaperError::ParamOutOfRange { name, .. }) => assert_eq!(name, "param1"),
            other => panic!("expected param1 range error, got {:?}", other),
        }

        let params = Params::default().with_repeats(6);
        assert!(params.validate().is_err());

        let params = Params::default().with_noise_floor_db(-10.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = Params::default().with_threshold_db(f64::NAN);
        assert_eq!(
            params.validate(),
            Err(ShaperError::NonFiniteParam {
                name: "threshold_db"
            })
        );
    }

    #[test]
    fn test_clamped_is_always_valid() {
        let wild = Params {
            curve_type: CurveType::Leveller,
            dc_block: true,
            threshold_db: 12.0,
            noise_floor_db: -200.0,
            param1: -5.0,
            param2: f64::NAN,
            repeats: 99,
        };
        let clamped = wild.clamped();
        assert!(clamped.validate().is_ok());
        assert_eq!(clamped.threshold_db, 0.0);
        assert_eq!(clamped.noise_floor_db, -80.0);
        assert_eq!(clamped.param1, 0.0);
        assert_eq!(clamped.param2, PARAM2.default);
        assert_eq!(clamped.repeats, MAX_REPEATS);
    }

    #[test]
    fn test_threshold_linear_floor() {
        let params = Params::default().with_threshold_db(-100.0);
        assert!((params.threshold_linear() - MIN_THRESHOLD_LINEAR).abs() < 1e-12);

        let params = Params::default().with_threshold_db(-6.0);
        assert!((params.threshold_linear() - 0.501_187).abs() < 1e-5);
    }

    #[test]
    fn test_db_round_trip() {
        for db in [-80.0, -20.0, -6.0, 0.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-9);
        }
    }

    #[test]
    fn test_curve_type_parse() {
        for curve in CurveType::ALL {
            assert_eq!(curve.key().parse::<CurveType>().ok(), Some(curve));
            assert_eq!(curve.label().parse::<CurveType>().ok(), Some(curve));
        }
        assert!("fuzz".parse::<CurveType>().is_err());
    }

    #[test]
    fn test_curve_type_cycle() {
        assert_eq!(CurveType::HardLimiter.next(), CurveType::HardClip);
        assert_eq!(CurveType::HardClip.prev(), CurveType::HardLimiter);
        for curve in CurveType::ALL {
            assert_eq!(CurveType::from_index(curve.index()), Some(curve));
        }
    }

    #[test]
    fn test_same_table_ignores_dc_block() {
        let a = Params::new(CurveType::Rectifier);
        let b = a.with_dc_block(true);
        assert!(a.same_table(&b));
        assert!(!a.same_table(&a.with_param2(10.0)));
    }
}
