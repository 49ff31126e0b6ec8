//! Transfer curve generators
//!
//! Each generator fills a lookup table from a parameter snapshot and returns
//! the makeup gain that restores level after the curve (1.0 for curves that
//! don't define one).
//!
//! # Table layout
//!
//! Index `STEPS` is the origin. Most curves compute indices
//! `STEPS..=2*STEPS` and mirror them into the negative half with
//! `table[n] = -table[2*STEPS - n]`, which makes them odd-symmetric with
//! the origin mapped to silence. Hard clip, hard limiter and
//! cubic fill the whole range directly; even harmonics and the rectifier are
//! deliberately asymmetric.
//!
//! # Division guards
//!
//! Every denominator that a parameter can drive to zero is floored before
//! use (`max(0.001, param2)`, `min(0.999, amount)`, the zero-amount
//! branches of the logarithmic and cubic curves). Parameters at the edges of
//! their domain produce a nearby valid curve instead of NaNs.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::params::{db_to_linear, CurveType, Params};
use crate::{STEPS, TABLE_SIZE};

/// Fills `table` for a parameter snapshot and returns the makeup gain.
pub type Generator = fn(&Params, &mut [f32]) -> f64;

impl CurveType {
    /// Generator that builds this curve's table.
    pub fn generator(self) -> Generator {
        match self {
            CurveType::HardClip => hard_clip,
            CurveType::SoftClip => soft_clip,
            CurveType::HalfSin => half_sin,
            CurveType::Exponential => exponential,
            CurveType::Logarithmic => logarithmic,
            CurveType::Cubic => cubic,
            CurveType::EvenHarmonics => even_harmonics,
            CurveType::Sine => sine,
            CurveType::Leveller => leveller,
            CurveType::Rectifier => rectifier,
            CurveType::HardLimiter => hard_limiter,
        }
    }
}

/// Build the table selected by `params.curve_type`, returning the makeup gain.
pub fn generate(params: &Params, table: &mut [f32]) -> f64 {
    debug_assert_eq!(table.len(), TABLE_SIZE);
    (params.curve_type.generator())(params, table)
}

/// Input amplitude of the positive-half index `n` (`STEPS..=2*STEPS`).
#[inline]
fn positive_input(n: usize) -> f64 {
    (n - STEPS) as f64 / STEPS as f64
}

/// Copy the negated positive half into the negative half.
pub fn mirror_half(table: &mut [f32]) {
    let last = TABLE_SIZE - 1;
    for n in 0..STEPS {
        table[n] = -table[last - n];
    }
}

/// Clip to +-threshold, identity in between.
pub fn hard_clip(params: &Params, table: &mut [f32]) -> f64 {
    let threshold = params.threshold_linear();
    let low = STEPS as f64 * (1.0 - threshold);
    let high = STEPS as f64 * (1.0 + threshold);

    for (n, value) in table.iter_mut().enumerate() {
        let pos = n as f64;
        let y = if pos < low {
            -threshold
        } else if pos > high {
            threshold
        } else {
            pos / STEPS as f64 - 1.0
        };
        *value = y as f32;
    }

    1.0 / threshold
}

/// Exponential knee above `threshold`: approaches `threshold + 1/ratio`.
#[inline]
fn knee(threshold: f64, value: f64, ratio: f64) -> f64 {
    threshold + ((ratio * (threshold - value)).exp() - 1.0) / -ratio
}

/// Identity up to the threshold, exponential roll-off above it.
///
/// `param1` sets the roll-off steepness, 2^(7 * param1 / 100), i.e. 1 to 128.
pub fn soft_clip(params: &Params, table: &mut [f32]) -> f64 {
    let threshold = params.threshold_linear();
    let ratio = 2.0_f64.powf(7.0 * params.param1 / 100.0);
    let peak = knee(threshold, 1.0, ratio);
    let knee_start = STEPS as f64 * (1.0 + threshold);

    table[STEPS] = 0.0;
    for n in STEPS..TABLE_SIZE {
        let x = n as f64 / STEPS as f64 - 1.0;
        let y = if (n as f64) < knee_start {
            x
        } else {
            knee(threshold, x, ratio)
        };
        table[n] = y as f32;
    }
    mirror_half(table);

    1.0 / peak
}

/// Whole and fractional passes of a saturating map.
///
/// `param1 / 20` passes: the integer part is applied fully, one more pass is
/// blended in by the fractional part so the curve moves smoothly with the
/// control.
fn iterated(params: &Params, table: &mut [f32], map: impl Fn(f64) -> f64) {
    let passes = params.param1 / 20.0;
    let whole = passes.floor() as usize;
    let fraction = passes - whole as f64;

    for n in STEPS..TABLE_SIZE {
        let mut y = positive_input(n);
        for _ in 0..whole {
            y = map(y);
        }
        y += (map(y) - y) * fraction;
        table[n] = y as f32;
    }
    mirror_half(table);
}

/// Repeated `sin(x * pi/2)`.
pub fn half_sin(params: &Params, table: &mut [f32]) -> f64 {
    iterated(params, table, |y| (y * FRAC_PI_2).sin());
    1.0
}

/// Repeated `(1 + sin(x * pi - pi/2)) / 2`, an S-curve that expands quiet
/// signals and compresses loud ones.
pub fn sine(params: &Params, table: &mut [f32]) -> f64 {
    iterated(params, table, |y| (1.0 + (y * PI - FRAC_PI_2).sin()) / 2.0);
    1.0
}

/// Exponential curve scaled to unity gain at 0 dB.
pub fn exponential(params: &Params, table: &mut [f32]) -> f64 {
    // 1.0 would make the scale blow up
    let amount = db_to_linear(-params.param1).min(0.999);
    let scale = -1.0 / (1.0 - amount);
    let log_amount = amount.ln();

    for n in STEPS..TABLE_SIZE {
        let curve = (positive_input(n) * log_amount).exp();
        table[n] = (scale * (curve - 1.0)) as f32;
    }
    mirror_half(table);
    1.0
}

/// `log(1 + amount*x) / log(1 + amount)` with `amount = param1`.
pub fn logarithmic(params: &Params, table: &mut [f32]) -> f64 {
    let amount = params.param1;

    if amount == 0.0 {
        // log(1) in the denominator
        for n in STEPS..TABLE_SIZE {
            table[n] = positive_input(n) as f32;
        }
    } else {
        let norm = amount.ln_1p();
        for n in STEPS..TABLE_SIZE {
            table[n] = ((amount * positive_input(n)).ln_1p() / norm) as f32;
        }
    }
    mirror_half(table);
    1.0
}

#[inline]
fn cubic_map(x: f64) -> f64 {
    x - x * x * x / 3.0
}

/// `x - x^3/3` over `-amount..=amount`, `amount = sqrt(3) * param1 / 100`,
/// applied once plus `repeats` more times.
///
/// At `param1 = 0` the table is the identity ramp; the cubic is bypassed
/// rather than scaled to nothing.
pub fn cubic(params: &Params, table: &mut [f32]) -> f64 {
    let amount = params.param1 * 3.0_f64.sqrt() / 100.0;

    if amount == 0.0 {
        for (n, value) in table.iter_mut().enumerate() {
            *value = (n as f64 / STEPS as f64 - 1.0) as f32;
        }
        return 1.0;
    }

    let gain = 1.0 / cubic_map(amount.min(1.0));
    let step = amount / STEPS as f64;

    for (n, value) in table.iter_mut().enumerate() {
        let x = -amount + n as f64 * step;
        let mut y = gain * cubic_map(x);
        for _ in 0..params.repeats {
            y = gain * cubic_map(y * amount);
        }
        *value = y as f32;
    }
    1.0
}

/// `(1 + a)x - x * (a / tanh(C)) * tanh(C x)`, `a = -param1/100`,
/// `C = max(0.001, param2) / 10`.
///
/// `x * tanh(C x)` is even, so this adds even-order harmonics and is built
/// over the full range without mirroring.
pub fn even_harmonics(params: &Params, table: &mut [f32]) -> f64 {
    let amount = params.param1 / -100.0;
    let c = params.param2.max(0.001) / 10.0;
    let weight = amount / c.tanh();

    for (n, value) in table.iter_mut().enumerate() {
        let x = n as f64 / STEPS as f64 - 1.0;
        *value = ((1.0 + amount) * x - x * weight * (c * x).tanh()) as f32;
    }
    1.0
}

const LEVELLER_POINTS: usize = 6;
const LEVELLER_GAINS: [f64; LEVELLER_POINTS] = [0.80, 1.00, 1.20, 1.20, 1.00, 0.80];
const LEVELLER_LIMITS: [f64; LEVELLER_POINTS] = [0.0001, 0.0, 0.1, 0.3, 0.5, 1.0];

/// Breakpoint segment for `value`: walk down from the top limit and stop at
/// the first limit at or below the value.
#[inline]
fn leveller_segment(limits: &[f64; LEVELLER_POINTS], value: f64) -> usize {
    let mut index = LEVELLER_POINTS - 1;
    for i in (0..LEVELLER_POINTS).rev() {
        if value >= limits[i] {
            break;
        }
        index = i;
    }
    index
}

/// Piecewise-linear levelling curve.
///
/// Six breakpoints (the second one is the noise floor) with per-segment
/// gains; each of `repeats` passes remaps the value through its segment's
/// affine map, then `param1 / 100` of one further pass is blended in.
pub fn leveller(params: &Params, table: &mut [f32]) -> f64 {
    let mut limits = LEVELLER_LIMITS;
    limits[1] = params.noise_floor_linear();
    let fractional_pass = params.param1 / 100.0;

    // Offsets keeping the segments continuous at each limit
    let mut add_on = [0.0; LEVELLER_POINTS];
    for i in 0..LEVELLER_POINTS - 1 {
        add_on[i + 1] = add_on[i] + limits[i] * (LEVELLER_GAINS[i] - LEVELLER_GAINS[i + 1]);
    }

    for n in STEPS..TABLE_SIZE {
        let mut y = positive_input(n);
        for _ in 0..params.repeats {
            let seg = leveller_segment(&limits, y);
            y = y * LEVELLER_GAINS[seg] + add_on[seg];
        }
        // Not worth extrapolating tiny fractions
        if fractional_pass > 0.001 {
            let seg = leveller_segment(&limits, y);
            y += fractional_pass * (y * (LEVELLER_GAINS[seg] - 1.0) + add_on[seg]);
        }
        table[n] = y as f32;
    }
    mirror_half(table);
    1.0
}

/// Positive half passes unchanged; an input of `-x` maps to
/// `x * (param1/50 - 1)`.
///
/// param1 = 0 is the identity, 50 is half-wave and 100 full-wave
/// rectification.
pub fn rectifier(params: &Params, table: &mut [f32]) -> f64 {
    let amount = params.param1 / 50.0 - 1.0;
    let step = 1.0 / STEPS as f64;

    for n in 0..=STEPS {
        table[STEPS + n] = (n as f64 * step) as f32;
    }
    for n in 1..=STEPS {
        table[STEPS - n] = (n as f64 * step * amount) as f32;
    }
    1.0
}

/// Hard clip table; the wet/residual mix happens per sample.
pub fn hard_limiter(params: &Params, table: &mut [f32]) -> f64 {
    hard_clip(params, table)
}
