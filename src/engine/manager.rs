use tracing::debug;

use crate::engine::instance::ProcessingInstance;
use crate::error::{Result, ShaperError};
use crate::params::Params;
use crate::MAX_BLOCK_SIZE;

/// Block size a realtime host should ask for.
pub const REALTIME_BLOCK_SIZE: usize = 512;

/// Owns the batch ("master") instance and one realtime processor per channel.
///
/// All instances read the same caller-owned `Params` snapshot, passed in on
/// every call, but each keeps its own table and DC history. Nothing is shared
/// between instances, so processors can be driven from different threads via
/// `processors_mut`.
#[derive(Default)]
pub struct InstanceManager {
    master: Option<ProcessingInstance>,
    processors: Vec<ProcessingInstance>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the master instance for a batch run.
    pub fn process_initialize(&mut self, sample_rate: f32, params: &Params) -> Result<()> {
        match self.master.as_mut() {
            Some(master) => master.initialize(sample_rate, params)?,
            None => self.master = Some(ProcessingInstance::new(sample_rate, params)?),
        }
        Ok(())
    }

    /// Process one batch block through the master instance.
    pub fn process_block(
        &mut self,
        params: &Params,
        input: &[f32],
        output: &mut [f32],
    ) -> Result<usize> {
        let master = self.master.as_mut().ok_or(ShaperError::NotInitialized)?;
        Ok(master.process_block(params, input, output))
    }

    /// Drop the master instance at the end of a batch run.
    pub fn process_finalize(&mut self) {
        self.master = None;
    }

    /// Run a whole signal through a freshly initialized master instance.
    pub fn render_offline(
        &mut self,
        params: &Params,
        sample_rate: f32,
        input: &[f32],
    ) -> Result<Vec<f32>> {
        self.process_initialize(sample_rate, params)?;

        let mut output = vec![0.0; input.len()];
        for (src, dst) in input
            .chunks(MAX_BLOCK_SIZE)
            .zip(output.chunks_mut(MAX_BLOCK_SIZE))
        {
            self.process_block(params, src, dst)?;
        }
        Ok(output)
    }

    pub fn master(&self) -> Option<&ProcessingInstance> {
        self.master.as_ref()
    }

    /// Start a realtime session with no processors.
    pub fn realtime_initialize(&mut self) {
        self.processors.clear();
    }

    /// Add a processor for one realtime channel; returns its group index.
    pub fn realtime_add_processor(&mut self, sample_rate: f32, params: &Params) -> Result<usize> {
        let processor = ProcessingInstance::new(sample_rate, params)?;
        self.processors.push(processor);
        let group = self.processors.len() - 1;
        debug!(group, sample_rate, "realtime processor added");
        Ok(group)
    }

    /// Process one realtime block for `group`.
    pub fn realtime_process(
        &mut self,
        group: usize,
        params: &Params,
        input: &[f32],
        output: &mut [f32],
    ) -> Result<usize> {
        let count = self.processors.len();
        let processor = self
            .processors
            .get_mut(group)
            .ok_or(ShaperError::UnknownProcessor { group, count })?;
        Ok(processor.process_block(params, input, output))
    }

    /// Tear down every realtime processor.
    pub fn realtime_finalize(&mut self) {
        debug!(count = self.processors.len(), "realtime processors finalized");
        self.processors.clear();
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    pub fn processor(&self, group: usize) -> Option<&ProcessingInstance> {
        self.processors.get(group)
    }

    /// Direct access for hosts that drive channels from separate threads.
    pub fn processors_mut(&mut self) -> &mut [ProcessingInstance] {
        &mut self.processors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CurveType;

    #[test]
    fn test_process_block_requires_initialize() {
        let mut manager = InstanceManager::new();
        let mut out = [0.0f32; 4];
        assert_eq!(
            manager.process_block(&Params::default(), &[0.1; 4], &mut out),
            Err(ShaperError::NotInitialized)
        );
    }

    #[test]
    fn test_batch_run() {
        let params = Params::new(CurveType::SoftClip);
        let mut manager = InstanceManager::new();
        manager.process_initialize(44_100.0, &params).unwrap();

        let input = vec![0.5f32; 300];
        let mut output = vec![0.0f32; 300];
        assert_eq!(manager.process_block(&params, &input, &mut output), Ok(300));
        assert!(output.iter().all(|s| s.is_finite()));

        manager.process_finalize();
        assert!(manager.master().is_none());
    }

    #[test]
    fn test_render_offline_matches_block_processing() {
        let params = Params::new(CurveType::Leveller).with_repeats(2);
        let input: Vec<f32> = (0..5_000).map(|i| ((i as f32) * 0.01).sin() * 0.7).collect();

        let mut manager = InstanceManager::new();
        let rendered = manager.render_offline(&params, 48_000.0, &input).unwrap();

        let mut single = ProcessingInstance::new(48_000.0, &params).unwrap();
        let mut expected = vec![0.0f32; input.len()];
        single.process_block(&params, &input, &mut expected);

        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_realtime_processors_are_independent() {
        let params = Params::new(CurveType::Rectifier).with_dc_block(true);
        let mut manager = InstanceManager::new();
        manager.realtime_initialize();
        assert_eq!(manager.realtime_add_processor(48_000.0, &params), Ok(0));
        assert_eq!(manager.realtime_add_processor(48_000.0, &params), Ok(1));

        // Feed only channel 0; channel 1's DC history stays empty
        let mut out = vec![0.0f32; 64];
        manager
            .realtime_process(0, &params, &vec![0.8; 64], &mut out)
            .unwrap();

        let mut first = [0.0f32; 1];
        manager
            .realtime_process(1, &params, &[0.8], &mut first)
            .unwrap();
        assert!(first[0].abs() < 1e-6);
    }

    #[test]
    fn test_unknown_group() {
        let mut manager = InstanceManager::new();
        manager.realtime_initialize();
        let mut out = [0.0f32; 1];
        assert_eq!(
            manager.realtime_process(2, &Params::default(), &[0.0], &mut out),
            Err(ShaperError::UnknownProcessor { group: 2, count: 0 })
        );
    }

    #[test]
    fn test_realtime_finalize_drops_processors() {
        let mut manager = InstanceManager::new();
        manager.realtime_initialize();
        manager
            .realtime_add_processor(48_000.0, &Params::default())
            .unwrap();
        assert_eq!(manager.processor_count(), 1);
        manager.realtime_finalize();
        assert_eq!(manager.processor_count(), 0);
        assert!(manager.processor(0).is_none());
    }

    #[test]
    fn test_add_processor_rejects_bad_rate() {
        let mut manager = InstanceManager::new();
        assert_eq!(
            manager.realtime_add_processor(0.0, &Params::default()),
            Err(ShaperError::InvalidSampleRate(0.0))
        );
        assert_eq!(manager.processor_count(), 0);
    }
}
