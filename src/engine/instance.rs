use tracing::{debug, trace};

use crate::dsp::{curves, DcBlocker, LookupTable};
use crate::error::{Result, ShaperError};
use crate::params::{CurveType, Params};
use crate::SKIP_SAMPLES;

/*
Processing Instance
===================

Everything one audio channel needs: its own lookup table, its own DC
blocker history, and the bookkeeping that decides when the table is stale.

Per sample:

  input ──> [pre-gain] ──> table lookup ──> output stage ──> [DC block] ──> out
            hard clip                        per curve        if enabled
            only

Output stage (p1 = param1/100, p2 = param2/100):

  HardClip, SoftClip          shaped * ((1 - p2) + makeup * p2)
  HalfSin, Exp, Log, Sine     shaped * p2
  Cubic, EvenHarmonics,
  Leveller, Rectifier         shaped
  HardLimiter                 shaped * (p1 - p2) + input * p2

Table refresh
-------------

  Stable ── live params differ from the table's snapshot ──> Dirty
  Dirty  ── SKIP_SAMPLES dirty samples processed ──> rebuild ──> Stable

Rebuilding on every sample while a knob moves would cost a full table per
sample, so a dirty instance keeps using the old table for SKIP_SAMPLES
samples and rebuilds on the next one. The comparison is redone at the start
of every block; an instance whose parameters stopped moving settles back to
Stable at its next rebuild.

Curve type and makeup gain come from the snapshot the table was built from,
so a lookup always pairs with its own curve's gain staging. The level
scalars (drive, makeup blend, output level, wet/residual) are not part of the
table and follow the live snapshot immediately.
*/

pub struct ProcessingInstance {
    sample_rate: f32,
    table: LookupTable,
    makeup_gain: f64,
    /// Snapshot the table was last built from.
    built: Params,
    /// Dirty samples processed since the last rebuild.
    skip_counter: usize,
    dc: DcBlocker,
}

impl ProcessingInstance {
    /// Create an instance and build its table from `params`.
    pub fn new(sample_rate: f32, params: &Params) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        params.validate()?;

        let mut instance = Self {
            sample_rate,
            table: LookupTable::new(),
            makeup_gain: 1.0,
            built: *params,
            skip_counter: 0,
            dc: DcBlocker::new(sample_rate),
        };
        instance.rebuild_table(params);

        debug!(
            sample_rate,
            curve = params.curve_type.key(),
            dc_window = instance.dc.window(),
            "processing instance initialized"
        );
        Ok(instance)
    }

    /// Reset for a new run: rebuild the table, clear DC history and the skip counter.
    ///
    /// The table buffer is reused; the DC queue is only reallocated when the
    /// sample rate changes.
    pub fn initialize(&mut self, sample_rate: f32, params: &Params) -> Result<()> {
        check_sample_rate(sample_rate)?;
        params.validate()?;

        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.dc = DcBlocker::new(sample_rate);
        } else {
            self.dc.reset();
        }
        self.rebuild_table(params);

        debug!(
            sample_rate,
            curve = params.curve_type.key(),
            "processing instance reinitialized"
        );
        Ok(())
    }

    /// Rebuild the table from `params` right away.
    pub fn rebuild_table(&mut self, params: &Params) {
        let params = params.clamped();
        self.makeup_gain = curves::generate(&params, self.table.as_mut_slice());
        self.built = params;
        self.skip_counter = 0;

        trace!(
            curve = params.curve_type.key(),
            makeup_gain = self.makeup_gain,
            "table rebuilt"
        );
    }

    /// Whether `params` would build a different table than the current one.
    pub fn is_dirty(&self, params: &Params) -> bool {
        !self.built.same_table(&params.clamped())
    }

    /// Process `min(input.len(), output.len())` samples, returning the count.
    pub fn process_block(&mut self, params: &Params, input: &[f32], output: &mut [f32]) -> usize {
        let len = input.len().min(output.len());
        if len == 0 {
            return 0;
        }

        let live = params.clamped();
        let mut dirty = self.begin_block(&live);

        for (out, &sample) in output[..len].iter_mut().zip(&input[..len]) {
            *out = self.next_sample(&live, &mut dirty, sample);
        }
        len
    }

    /// Process a buffer in place, returning the number of samples processed.
    pub fn process_in_place(&mut self, params: &Params, buffer: &mut [f32]) -> usize {
        if buffer.is_empty() {
            return 0;
        }

        let live = params.clamped();
        let mut dirty = self.begin_block(&live);

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(&live, &mut dirty, *sample);
        }
        buffer.len()
    }

    /// Dirty check for a new block. A Stable block drops any count left over
    /// from parameters that moved and came back, so the next change waits a
    /// full SKIP_SAMPLES.
    #[inline]
    fn begin_block(&mut self, live: &Params) -> bool {
        let dirty = !self.built.same_table(live);
        if !dirty {
            self.skip_counter = 0;
        }
        dirty
    }

    #[inline]
    fn next_sample(&mut self, live: &Params, dirty: &mut bool, input: f32) -> f32 {
        if *dirty {
            self.skip_counter += 1;
            if self.skip_counter > SKIP_SAMPLES {
                self.rebuild_table(live);
                *dirty = false;
            }
        }

        let out = self.shape(live, input);

        if live.dc_block {
            self.dc.next_sample(out)
        } else {
            out
        }
    }

    /// Table lookup plus the per-curve output stage, without DC blocking.
    #[inline]
    pub fn shape(&self, live: &Params, input: f32) -> f32 {
        let p1 = live.param1 / 100.0;
        let p2 = live.param2 / 100.0;

        match self.built.curve_type {
            CurveType::HardClip => {
                let driven = input * (1.0 + p1) as f32;
                let gain = (1.0 - p2) + self.makeup_gain * p2;
                (self.table.lookup(driven) as f64 * gain) as f32
            }
            CurveType::SoftClip => {
                let gain = (1.0 - p2) + self.makeup_gain * p2;
                (self.table.lookup(input) as f64 * gain) as f32
            }
            CurveType::HalfSin
            | CurveType::Exponential
            | CurveType::Logarithmic
            | CurveType::Sine => (self.table.lookup(input) as f64 * p2) as f32,
            CurveType::Cubic
            | CurveType::EvenHarmonics
            | CurveType::Leveller
            | CurveType::Rectifier => self.table.lookup(input),
            CurveType::HardLimiter => {
                let shaped = self.table.lookup(input) as f64;
                (shaped * (p1 - p2) + input as f64 * p2) as f32
            }
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    #[inline]
    pub fn makeup_gain(&self) -> f64 {
        self.makeup_gain
    }

    /// Parameters the current table was built from.
    #[inline]
    pub fn built_params(&self) -> &Params {
        &self.built
    }

    #[inline]
    pub fn dc_blocker(&self) -> &DcBlocker {
        &self.dc
    }
}

/// Highest accepted sample rate; keeps the DC window allocation bounded.
pub const MAX_SAMPLE_RATE: f32 = 1_000_000.0;

fn check_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate <= MAX_SAMPLE_RATE {
        Ok(())
    } else {
        Err(ShaperError::InvalidSampleRate(sample_rate))
    }
}
