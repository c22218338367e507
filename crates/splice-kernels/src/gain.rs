//! Gain kernel.
//!
//! Multiplies every input channel by one gain parameter. Immediate changes
//! jump; host-scheduled ramps move the gain linearly, sample by sample.

use splice::prelude::*;

// =============================================================================
// Parameters
// =============================================================================

/// Parameter addresses of [`GainKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
pub enum GainAddress {
    #[address = 0]
    Gain,
}

/// Parameter specs of [`GainKernel`], in address order.
pub const GAIN_PARAMETERS: [ParameterSpec; 1] = [ParameterSpec::new("gain", "Gain")
    .with_range(0.0, 1.0)
    .with_default(1.0)];

// =============================================================================
// Kernel
// =============================================================================

/// Sample-accurate gain.
#[derive(Debug, Clone)]
pub struct GainKernel {
    parameters: ParameterTable<GainAddress, 1>,
    bypassed: bool,
    config: KernelConfig,
}

impl GainKernel {
    /// Create a kernel at unity gain with the default configuration.
    pub fn new() -> Self {
        let config = KernelConfig::default();
        let mut parameters = ParameterTable::new(GAIN_PARAMETERS);
        parameters.set_sample_rate(config.sample_rate);
        Self {
            parameters,
            bypassed: false,
            config,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Prepare for rendering with `config`.
    ///
    /// Parameter values survive re-initialization.
    pub fn initialize(&mut self, config: &KernelConfig) -> SpliceResult<()> {
        config.validate().inspect_err(|e| {
            log::error!("Gain kernel initialization failed: {}", e);
        })?;
        self.config = *config;
        self.parameters.set_sample_rate(config.sample_rate);
        log::debug!(
            "Gain kernel initialized: {} Hz, up to {} frames",
            config.sample_rate,
            config.max_frames_to_render
        );
        Ok(())
    }

    /// Release render resources.
    pub fn deinitialize(&mut self) {
        log::debug!("Gain kernel deinitialized");
    }

    /// Current configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Largest frame count per render call.
    pub fn maximum_frames_to_render(&self) -> FrameCount {
        self.config.max_frames_to_render
    }

    /// Change the largest frame count per render call.
    pub fn set_maximum_frames_to_render(&mut self, frames: FrameCount) {
        self.config.max_frames_to_render = frames;
    }

    // =========================================================================
    // Parameters and Bypass
    // =========================================================================

    /// Set a parameter by host address. Unknown addresses are ignored.
    pub fn set_parameter(&mut self, address: RawAddress, value: ParameterValue) {
        self.parameters.set_raw(address, value);
    }

    /// Goal value of a parameter, or 0 for an unknown address.
    pub fn get_parameter(&self, address: RawAddress) -> ParameterValue {
        self.parameters.goal_raw(address).unwrap_or(0.0)
    }

    /// The gain currently applied, which may lag the goal during a ramp.
    pub fn current_gain(&self) -> ParameterValue {
        self.parameters.current(GainAddress::Gain)
    }

    /// Parameter table, for inspection.
    pub fn parameters(&self) -> &ParameterTable<GainAddress, 1> {
        &self.parameters
    }

    pub fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}

impl Default for GainKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> AudioKernel<S> for GainKernel {
    fn process(&mut self, buffer: &mut Buffer<'_, S>, _segment_start: SampleTime) {
        if self.bypassed {
            return;
        }

        let frames = buffer.num_frames();
        let smoother = self.parameters.smoother(GainAddress::Gain).clone();

        if smoother.is_smoothing() {
            // Every channel walks the same ramp
            for (input, output) in buffer.zip_channels() {
                let mut ramp = smoother.clone();
                for (i, o) in input.iter().zip(output.iter_mut()) {
                    *o = *i * S::from_f64(ramp.next());
                }
            }
        } else {
            let gain = S::from_f64(smoother.current());
            for (input, output) in buffer.zip_channels() {
                for (i, o) in input.iter().zip(output.iter_mut()) {
                    *o = *i * gain;
                }
            }
        }

        for ch in buffer.num_input_channels()..buffer.num_output_channels() {
            if let Some(output) = buffer.output(ch) {
                output.fill(S::ZERO);
            }
        }

        self.parameters.skip(frames);
    }

    fn handle_one_event(&mut self, _now: SampleTime, event: &RenderEvent<'_>) {
        match event.kind {
            RenderEventKind::Parameter(p) => self.set_parameter(p.address, p.value),
            RenderEventKind::ParameterRamp(r) => {
                self.parameters
                    .ramp_raw(r.address, r.end_value, r.duration_frames);
            }
            RenderEventKind::Midi(_) | RenderEventKind::MidiEventList(_) => {}
        }
    }

    fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        kernel: &mut GainKernel,
        input: &[f32],
        start: SampleTime,
        events: &[RenderEvent<'_>],
    ) -> (Vec<f32>, RenderStats) {
        let helper = AudioProcessHelper::new(1, 1, kernel.config()).unwrap();
        let mut output = vec![0.0f32; input.len()];
        let stats = helper
            .process_with_events(
                kernel,
                &[input],
                &mut [&mut output[..]],
                start,
                input.len() as FrameCount,
                events,
            )
            .unwrap();
        (output, stats)
    }

    #[test]
    fn test_parameter_surface() {
        let mut kernel = GainKernel::new();
        assert_eq!(kernel.get_parameter(0), 1.0);
        kernel.set_parameter(0, 0.25);
        assert_eq!(kernel.get_parameter(0), 0.25);

        kernel.set_parameter(7, 0.5);
        assert_eq!(kernel.get_parameter(7), 0.0);
        assert_eq!(kernel.get_parameter(0), 0.25);
        assert_eq!(GainAddress::Gain.identifier(), "gain");
    }

    #[test]
    fn test_sample_accurate_change() {
        let mut kernel = GainKernel::new();
        let input = vec![1.0f32; 512];
        let events = [RenderEvent::parameter(200, 0, 0.5)];

        let (output, stats) = render(&mut kernel, &input, 0, &events);

        assert_eq!(stats.segments, 2);
        assert!(output[..200].iter().all(|&s| s == 1.0));
        assert!(output[200..].iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_late_event_applies_before_audio() {
        let mut kernel = GainKernel::new();
        let input = vec![1.0f32; 64];
        let events = [RenderEvent::parameter(900, 0, 0.5)];

        let (output, stats) = render(&mut kernel, &input, 1000, &events);

        assert_eq!(stats.events, 1);
        assert!(output.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_ramp_event() {
        let mut kernel = GainKernel::new();
        let input = vec![1.0f32; 16];
        let events = [RenderEvent::parameter_ramp(4, 0, 0.0, 8)];

        let (output, _) = render(&mut kernel, &input, 0, &events);

        assert!(output[..4].iter().all(|&s| s == 1.0));
        assert!((output[4] - 0.875).abs() < 1e-6);
        assert!((output[7] - 0.5).abs() < 1e-6);
        assert!(output[11..].iter().all(|&s| s == 0.0));
        assert_eq!(kernel.get_parameter(0), 0.0);
    }

    #[test]
    fn test_ramp_spans_render_calls() {
        let mut kernel = GainKernel::new();
        let input = vec![1.0f32; 8];
        let events = [RenderEvent::parameter_ramp(0, 0, 0.0, 16)];

        let (first, _) = render(&mut kernel, &input, 0, &events);
        assert!((first[7] - 0.5).abs() < 1e-6);
        // Goal is reported immediately, the audible value lags
        assert_eq!(kernel.get_parameter(0), 0.0);
        assert!((kernel.current_gain() - 0.5).abs() < 1e-6);

        let (second, _) = render(&mut kernel, &input, 8, &[]);
        assert!((second[0] - 0.4375).abs() < 1e-6);
        assert_eq!(second[7], 0.0);
    }

    #[test]
    fn test_bypass_freezes_ramp() {
        let mut kernel = GainKernel::new();
        let input = vec![1.0f32; 8];
        let events = [RenderEvent::parameter_ramp(0, 0, 0.0, 16)];
        render(&mut kernel, &input, 0, &events);
        let before = kernel.current_gain();

        kernel.set_bypass(true);
        let (bypassed, _) = render(&mut kernel, &input, 8, &[]);
        assert!(bypassed.iter().all(|&s| s == 1.0));
        assert_eq!(kernel.current_gain(), before);
        assert!(kernel.parameters().is_ramping(GainAddress::Gain));

        kernel.set_bypass(false);
        let (resumed, _) = render(&mut kernel, &input, 16, &[]);
        assert!((resumed[0] - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_f64_processing() {
        let mut kernel = GainKernel::new();
        kernel.set_parameter(0, 0.5);
        let left = [2.0f64; 4];
        let mut out_left = [0.0f64; 4];
        let mut out_right = [1.0f64; 4];

        let mut buffer = Buffer::new([&left[..]], [&mut out_left[..], &mut out_right[..]], 4);
        AudioKernel::<f64>::process(&mut kernel, &mut buffer, 0);

        assert_eq!(out_left, [1.0; 4]);
        assert_eq!(out_right, [0.0; 4]);
    }

    #[test]
    fn test_initialize() {
        let mut kernel = GainKernel::new();
        assert!(kernel.initialize(&KernelConfig::new(0.0)).is_err());

        let config = KernelConfig::new(96_000.0).with_max_frames_to_render(256);
        kernel.initialize(&config).unwrap();
        assert_eq!(kernel.maximum_frames_to_render(), 256);
        kernel.set_maximum_frames_to_render(512);
        assert_eq!(kernel.maximum_frames_to_render(), 512);
        kernel.deinitialize();
    }
}
