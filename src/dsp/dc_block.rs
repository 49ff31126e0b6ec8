use std::collections::VecDeque;

/*
DC Blocker
==========

Subtracts the mean of the last 50 ms from each sample.

  window = floor(sample_rate / 20)

  push x into the queue, add it to the running sum
  if the queue is longer than window: pop the oldest, subtract it
  y = x - sum / queue_len

A rolling average settles in one window, so there is much less offset at
the start of a stream than an IIR high-pass would leave. The queue is
allocated once with room for window + 1 values and never grows past that.

A window of zero (sample rates under 20 Hz) disables the filter.
*/

pub struct DcBlocker {
    window: usize,
    queue: VecDeque<f32>,
    sum: f64,
}

impl DcBlocker {
    pub fn new(sample_rate: f32) -> Self {
        let window = Self::window_for(sample_rate);
        Self {
            window,
            queue: VecDeque::with_capacity(window.saturating_add(1)),
            sum: 0.0,
        }
    }

    /// Rolling-average length in samples for a sample rate (50 ms).
    pub fn window_for(sample_rate: f32) -> usize {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            (sample_rate as f64 / 20.0).floor() as usize
        } else {
            0
        }
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.window > 0
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        if self.window == 0 {
            return sample;
        }

        self.sum += sample as f64;
        self.queue.push_back(sample);

        if self.queue.len() > self.window {
            if let Some(oldest) = self.queue.pop_front() {
                self.sum -= oldest as f64;
            }
        }

        (sample as f64 - self.sum / self.queue.len() as f64) as f32
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.queue.clear();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_fifty_ms() {
        assert_eq!(DcBlocker::window_for(44_100.0), 2205);
        assert_eq!(DcBlocker::window_for(48_000.0), 2400);
        assert_eq!(DcBlocker::window_for(19.0), 0);
        assert_eq!(DcBlocker::window_for(0.0), 0);
        assert_eq!(DcBlocker::window_for(f32::NAN), 0);
    }

    #[test]
    fn test_constant_offset_converges_to_zero() {
        let sample_rate = 8_000.0;
        let mut dc = DcBlocker::new(sample_rate);
        let mut buffer = vec![0.3f32; dc.window() * 3];

        dc.render(&mut buffer);

        let tail = &buffer[buffer.len() - 100..];
        for &sample in tail {
            assert!(sample.abs() < 1e-5, "expected offset removed, got {}", sample);
        }
    }

    #[test]
    fn test_first_sample_is_removed_entirely() {
        let mut dc = DcBlocker::new(48_000.0);
        assert!(dc.next_sample(0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mean_signal_passes() {
        let sample_rate = 8_000.0;
        let mut dc = DcBlocker::new(sample_rate);
        let window = dc.window();

        // Whole periods per window keep the rolling mean at zero
        let period = 40;
        let input: Vec<f32> = (0..window * 4)
            .map(|i| (std::f32::consts::TAU * (i % period) as f32 / period as f32).sin() * 0.5)
            .collect();
        let mut buffer = input.clone();
        dc.render(&mut buffer);

        for (i, (&out, &inp)) in buffer.iter().zip(input.iter()).enumerate().skip(window) {
            assert!(
                (out - inp).abs() < 1e-3,
                "sample {} changed from {} to {}",
                i,
                inp,
                out
            );
        }
    }

    #[test]
    fn test_offset_on_signal_is_removed() {
        let sample_rate = 8_000.0;
        let mut dc = DcBlocker::new(sample_rate);
        let window = dc.window();
        let period = 40;
        let input: Vec<f32> = (0..window * 4)
            .map(|i| {
                0.25 + (std::f32::consts::TAU * (i % period) as f32 / period as f32).sin() * 0.5
            })
            .collect();
        let mut buffer = input.clone();
        dc.render(&mut buffer);

        let tail = &buffer[window * 2..];
        let mean: f32 = tail.iter().sum::<f32>() / tail.len() as f32;
        assert!(mean.abs() < 1e-3, "residual offset {}", mean);
    }

    #[test]
    fn test_window_saturates_for_absurd_rates() {
        assert_eq!(DcBlocker::window_for(f32::MAX), usize::MAX);
    }

    #[test]
    fn test_disabled_window_passes_through() {
        let mut dc = DcBlocker::new(10.0);
        assert!(!dc.is_enabled());
        assert_eq!(dc.next_sample(0.7), 0.7);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut dc = DcBlocker::new(8_000.0);
        let mut buffer = vec![1.0f32; 64];
        dc.render(&mut buffer);
        dc.reset();
        assert!(dc.next_sample(-0.2).abs() < 1e-9);
    }
}
