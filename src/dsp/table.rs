use crate::{STEPS, TABLE_SIZE};

/*
Lookup Table
============

A transfer curve sampled at STEPS points per unit of amplitude over the
input range -1.0 ..= 1.0:

  index      0 ........ STEPS ........ 2*STEPS
  input    -1.0          0.0            +1.0

Looking up a sample:

  pos    = (sample + 1) * STEPS
  index  = floor(pos), clamped to 0 ..= 2*STEPS - 1
  offset = pos - index, clamped to 0 ..= 1
  out    = table[index] + (table[index + 1] - table[index]) * offset

Clamping the offset means anything beyond +-1.0 reads the edge value of the
table, so the table edge behaves like a clipper. At the knots (sample =
k / STEPS) the offset is zero and the lookup returns the stored value
exactly.
*/

/// One fixed-size transfer table, owned by exactly one processing instance.
///
/// Allocated once at construction, rewritten in place on every rebuild.
#[derive(Clone)]
pub struct LookupTable {
    values: Box<[f32]>,
}

impl LookupTable {
    /// Identity ramp from -1.0 to 1.0.
    pub fn new() -> Self {
        let mut table = Self {
            values: vec![0.0; TABLE_SIZE].into_boxed_slice(),
        };
        for (n, value) in table.values.iter_mut().enumerate() {
            *value = (n as f64 / STEPS as f64 - 1.0) as f32;
        }
        table
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Value at the table origin (input 0.0).
    #[inline]
    pub fn origin(&self) -> f32 {
        self.values[STEPS]
    }

    /// Map one sample through the curve with linear interpolation.
    #[inline]
    pub fn lookup(&self, sample: f32) -> f32 {
        let pos = (sample as f64 + 1.0) * STEPS as f64;
        let index = pos.floor().clamp(0.0, (2 * STEPS - 1) as f64) as usize;
        let offset = (pos - index as f64).clamp(0.0, 1.0);

        let y0 = self.values[index];
        let y1 = self.values[index + 1];
        y0 + (y1 - y0) * offset as f32
    }

    /// Apply `lookup` to every sample of a buffer in place.
    pub fn lookup_buffer(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.lookup(*sample);
        }
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable")
            .field("len", &self.values.len())
            .field("origin", &self.origin())
            .finish()
    }
}

/// Input amplitude represented by table index `n`.
#[inline]
pub fn knot_input(n: usize) -> f64 {
    n as f64 / STEPS as f64 - 1.0
}
