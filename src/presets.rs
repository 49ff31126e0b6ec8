#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Result, ShaperError};
use crate::params::{CurveType, Params};

/// A named parameter bundle.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub params: Params,
}

const fn preset(
    name: &'static str,
    curve_type: CurveType,
    dc_block: bool,
    threshold_db: f64,
    noise_floor_db: f64,
    param1: f64,
    param2: f64,
    repeats: u32,
) -> Preset {
    Preset {
        name,
        params: Params {
            curve_type,
            dc_block,
            threshold_db,
            noise_floor_db,
            param1,
            param2,
            repeats,
        },
    }
}

use CurveType::*;

#[rustfmt::skip]
//                                                    curve          dc     thresh  floor   p1     p2    rep
pub const FACTORY_PRESETS: [Preset; 20] = [
    preset("Hard clip -12dB, 80% make-up gain",      HardClip,      false, -12.0, -70.0,   0.0, 80.0, 0),
    preset("Soft clip -12dB, 80% make-up gain",      SoftClip,      false, -12.0, -70.0,  50.0, 80.0, 0),
    preset("Fuzz Box",                               SoftClip,      false, -30.0, -70.0,  80.0, 80.0, 0),
    preset("Walkie-talkie",                          SoftClip,      false, -50.0, -70.0,  60.0, 80.0, 0),
    preset("Blues drive sustain",                    HalfSin,       false,  -6.0, -70.0,  30.0, 80.0, 0),
    preset("Light Crunch Overdrive",                 Exponential,   false,  -6.0, -70.0,  20.0, 80.0, 0),
    preset("Heavy Overdrive",                        Logarithmic,   false,  -6.0, -70.0,  90.0, 80.0, 0),
    preset("3rd Harmonic (Perfect Fifth)",           Cubic,         false,  -6.0, -70.0, 100.0, 60.0, 0),
    preset("Valve Overdrive",                        EvenHarmonics, true,   -6.0, -70.0,  30.0, 40.0, 0),
    preset("2nd Harmonic (Octave)",                  EvenHarmonics, true,   -6.0, -70.0,  50.0,  0.0, 0),
    preset("Gated Expansion Distortion",             Sine,          false,  -6.0, -70.0,  30.0, 80.0, 0),
    preset("Leveller, Light, -70dB noise floor",     Leveller,      false,  -6.0, -70.0,   0.0, 50.0, 1),
    preset("Leveller, Moderate, -70dB noise floor",  Leveller,      false,  -6.0, -70.0,   0.0, 50.0, 2),
    preset("Leveller, Heavy, -70dB noise floor",     Leveller,      false,  -6.0, -70.0,   0.0, 50.0, 3),
    preset("Leveller, Heavier, -70dB noise floor",   Leveller,      false,  -6.0, -70.0,   0.0, 50.0, 4),
    preset("Leveller, Heaviest, -70dB noise floor",  Leveller,      false,  -6.0, -70.0,   0.0, 50.0, 5),
    preset("Half-wave Rectifier",                    Rectifier,     false,  -6.0, -70.0,  50.0, 50.0, 0),
    preset("Full-wave Rectifier",                    Rectifier,     false,  -6.0, -70.0, 100.0, 50.0, 0),
    preset("Full-wave Rectifier (DC blocked)",       Rectifier,     true,   -6.0, -70.0, 100.0, 50.0, 0),
    preset("Percussion Limiter",                     HardLimiter,   false, -12.0, -70.0, 100.0, 30.0, 0),
];

pub fn by_index(index: usize) -> Option<&'static Preset> {
    FACTORY_PRESETS.get(index)
}

/// Case-insensitive lookup by full name.
pub fn by_name(name: &str) -> Result<&'static Preset> {
    let needle = name.trim();
    FACTORY_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(needle))
        .ok_or_else(|| ShaperError::UnknownPreset(name.to_string()))
}
