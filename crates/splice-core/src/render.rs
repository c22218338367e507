//! Kernel traits and host-facing render helpers.
//!
//! A kernel is the stateful processor. It renders one segment at a time and
//! applies one event at a time; it never sees the whole render call. The
//! helpers in this module sit between the host and the kernel:
//!
//! - [`AudioProcessHelper`] checks the host's buffers once per call, then
//!   drives an [`AudioKernel`] through the segmenter with a [`Buffer`] view
//!   of each segment. A bypassed kernel gets its input copied to its output.
//! - [`MidiProcessHelper`] does the same for a [`MidiKernel`], which has no
//!   audio and only needs the segment's start time and length.
//!
//! # Example
//!
//! ```ignore
//! let helper = AudioProcessHelper::new(2, 2, &config)?;
//!
//! // On the render thread:
//! helper.process_with_events(&mut kernel, &inputs, &mut outputs, now, frames, &events)?;
//! ```

use crate::buffer::Buffer;
use crate::config::KernelConfig;
use crate::error::{SpliceError, SpliceResult};
use crate::event::RenderEvent;
use crate::sample::Sample;
use crate::segmenter::{self, RenderStats, SegmentProcessor};
use crate::types::{FrameCount, SampleTime, MAX_CHANNELS};

// =============================================================================
// Kernel Traits
// =============================================================================

/// An audio-in, audio-out kernel.
pub trait AudioKernel<S: Sample = f32> {
    /// Render one segment.
    ///
    /// `buffer` starts at the segment's first frame. `segment_start` is the
    /// absolute sample time of that frame. Does nothing while bypassed.
    fn process(&mut self, buffer: &mut Buffer<'_, S>, segment_start: SampleTime);

    /// Apply one scheduled event at cursor time `now`.
    fn handle_one_event(&mut self, now: SampleTime, event: &RenderEvent<'_>);

    /// Returns true while the kernel is bypassed.
    fn is_bypassed(&self) -> bool {
        false
    }
}

/// A MIDI-only kernel.
pub trait MidiKernel {
    /// Advance by one segment of `frame_count` frames starting at
    /// `segment_start`, emitting whatever MIDI is due.
    fn process(&mut self, segment_start: SampleTime, frame_count: FrameCount);

    /// Apply one scheduled event at cursor time `now`.
    fn handle_one_event(&mut self, now: SampleTime, event: &RenderEvent<'_>);
}

// =============================================================================
// Segment Adapters
// =============================================================================

struct AudioSegments<'k, 'b, 'host, K: ?Sized, S: Sample> {
    kernel: &'k mut K,
    inputs: &'b [&'b [S]],
    outputs: &'b mut [&'host mut [S]],
}

impl<K, S> SegmentProcessor for AudioSegments<'_, '_, '_, K, S>
where
    K: AudioKernel<S> + ?Sized,
    S: Sample,
{
    fn process_segment(&mut self, now: SampleTime, frame_offset: FrameCount, frame_count: FrameCount) {
        let mut buffer = Buffer::segment(
            self.inputs,
            &mut *self.outputs,
            frame_offset as usize,
            frame_count as usize,
        );
        if self.kernel.is_bypassed() {
            buffer.pass_through();
        } else {
            self.kernel.process(&mut buffer, now);
        }
    }

    fn handle_event(&mut self, now: SampleTime, event: &RenderEvent<'_>) {
        self.kernel.handle_one_event(now, event);
    }
}

struct MidiSegments<'k, K: ?Sized> {
    kernel: &'k mut K,
}

impl<K: MidiKernel + ?Sized> SegmentProcessor for MidiSegments<'_, K> {
    fn process_segment(&mut self, now: SampleTime, _frame_offset: FrameCount, frame_count: FrameCount) {
        self.kernel.process(now, frame_count);
    }

    fn handle_event(&mut self, now: SampleTime, event: &RenderEvent<'_>) {
        self.kernel.handle_one_event(now, event);
    }
}

// =============================================================================
// Audio Helper
// =============================================================================

/// Render-call guard and driver for audio kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioProcessHelper {
    input_channels: usize,
    output_channels: usize,
    max_frames_to_render: FrameCount,
}

impl AudioProcessHelper {
    /// Create a helper for a fixed channel layout.
    ///
    /// Fails if the configuration is invalid or either side has more than
    /// [`MAX_CHANNELS`] channels.
    pub fn new(
        input_channels: usize,
        output_channels: usize,
        config: &KernelConfig,
    ) -> SpliceResult<Self> {
        config.validate().inspect_err(|e| {
            log::error!("Rejected render configuration: {}", e);
        })?;
        if input_channels > MAX_CHANNELS || output_channels > MAX_CHANNELS {
            let e = SpliceError::InvalidConfiguration(format!(
                "{} in / {} out channels exceeds the limit of {}",
                input_channels, output_channels, MAX_CHANNELS
            ));
            log::error!("Rejected render configuration: {}", e);
            return Err(e);
        }

        log::debug!(
            "Audio process helper: {} in, {} out, up to {} frames",
            input_channels,
            output_channels,
            config.max_frames_to_render
        );

        Ok(Self {
            input_channels,
            output_channels,
            max_frames_to_render: config.max_frames_to_render,
        })
    }

    /// Largest frame count accepted per call.
    pub fn max_frames_to_render(&self) -> FrameCount {
        self.max_frames_to_render
    }

    /// Render `frame_count` frames into `outputs`, applying `events` at their
    /// sample times.
    ///
    /// The call is rejected before anything is rendered if the frame count
    /// exceeds the configured limit, the channel counts differ from the
    /// negotiated layout, or any channel is shorter than `frame_count`.
    pub fn process_with_events<'e, 'a: 'e, K, S>(
        &self,
        kernel: &mut K,
        inputs: &[&[S]],
        outputs: &mut [&mut [S]],
        start: SampleTime,
        frame_count: FrameCount,
        events: impl IntoIterator<Item = &'e RenderEvent<'a>>,
    ) -> SpliceResult<RenderStats>
    where
        K: AudioKernel<S> + ?Sized,
        S: Sample,
    {
        self.check(inputs, outputs, frame_count).inspect_err(|e| {
            log::warn!("Rejected render call: {}", e);
        })?;

        let mut segments = AudioSegments {
            kernel,
            inputs,
            outputs,
        };
        Ok(segmenter::process_with_events(
            &mut segments,
            start,
            frame_count,
            events,
        ))
    }

    fn check<S: Sample>(
        &self,
        inputs: &[&[S]],
        outputs: &[&mut [S]],
        frame_count: FrameCount,
    ) -> SpliceResult<()> {
        check_frame_count(frame_count, self.max_frames_to_render)?;

        if inputs.len() != self.input_channels {
            return Err(SpliceError::ChannelMismatch {
                expected: self.input_channels,
                actual: inputs.len(),
            });
        }
        if outputs.len() != self.output_channels {
            return Err(SpliceError::ChannelMismatch {
                expected: self.output_channels,
                actual: outputs.len(),
            });
        }

        let required = frame_count as usize;
        let lengths = inputs
            .iter()
            .map(|ch| ch.len())
            .chain(outputs.iter().map(|ch| ch.len()));
        for (channel, len) in lengths.enumerate() {
            if len < required {
                return Err(SpliceError::BufferTooShort {
                    channel,
                    len,
                    required,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// MIDI Helper
// =============================================================================

/// Render-call guard and driver for MIDI kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiProcessHelper {
    max_frames_to_render: FrameCount,
}

impl MidiProcessHelper {
    /// Create a helper. Fails if the configuration is invalid.
    pub fn new(config: &KernelConfig) -> SpliceResult<Self> {
        config.validate().inspect_err(|e| {
            log::error!("Rejected render configuration: {}", e);
        })?;
        log::debug!(
            "MIDI process helper: up to {} frames",
            config.max_frames_to_render
        );
        Ok(Self {
            max_frames_to_render: config.max_frames_to_render,
        })
    }

    /// Largest frame count accepted per call.
    pub fn max_frames_to_render(&self) -> FrameCount {
        self.max_frames_to_render
    }

    /// Advance the kernel by `frame_count` frames, applying `events` at
    /// their sample times.
    pub fn process_with_events<'e, 'a: 'e, K>(
        &self,
        kernel: &mut K,
        start: SampleTime,
        frame_count: FrameCount,
        events: impl IntoIterator<Item = &'e RenderEvent<'a>>,
    ) -> SpliceResult<RenderStats>
    where
        K: MidiKernel + ?Sized,
    {
        check_frame_count(frame_count, self.max_frames_to_render).inspect_err(|e| {
            log::warn!("Rejected render call: {}", e);
        })?;

        let mut segments = MidiSegments { kernel };
        Ok(segmenter::process_with_events(
            &mut segments,
            start,
            frame_count,
            events,
        ))
    }
}

fn check_frame_count(requested: FrameCount, maximum: FrameCount) -> SpliceResult<()> {
    if requested > maximum {
        return Err(SpliceError::TooManyFrames { requested, maximum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RenderEventKind;

    /// Multiplies input by a gain that events can change.
    struct Scale {
        gain: f32,
        bypassed: bool,
        segments: Vec<(SampleTime, usize)>,
    }

    impl Scale {
        fn new() -> Self {
            Self {
                gain: 1.0,
                bypassed: false,
                segments: Vec::new(),
            }
        }
    }

    impl AudioKernel for Scale {
        fn process(&mut self, buffer: &mut Buffer<'_, f32>, segment_start: SampleTime) {
            self.segments.push((segment_start, buffer.num_frames()));
            for (input, output) in buffer.zip_channels() {
                for (i, o) in input.iter().zip(output.iter_mut()) {
                    *o = *i * self.gain;
                }
            }
        }

        fn handle_one_event(&mut self, _now: SampleTime, event: &RenderEvent<'_>) {
            if let RenderEventKind::Parameter(p) = event.kind {
                self.gain = p.value;
            }
        }

        fn is_bypassed(&self) -> bool {
            self.bypassed
        }
    }

    #[test]
    fn test_sample_accurate_gain_change() {
        let helper = AudioProcessHelper::new(1, 1, &KernelConfig::default()).unwrap();
        let mut kernel = Scale::new();
        let input = vec![1.0f32; 512];
        let mut output = vec![0.0f32; 512];
        let events = [RenderEvent::parameter(200, 0, 0.5)];

        let stats = helper
            .process_with_events(
                &mut kernel,
                &[&input[..]],
                &mut [&mut output[..]],
                0,
                512,
                &events,
            )
            .unwrap();

        assert_eq!(stats.segments, 2);
        assert!(output[..200].iter().all(|&s| s == 1.0));
        assert!(output[200..].iter().all(|&s| s == 0.5));
        assert_eq!(kernel.segments, vec![(0, 200), (200, 312)]);
    }

    #[test]
    fn test_bypass_passes_input_through() {
        let helper = AudioProcessHelper::new(1, 2, &KernelConfig::default()).unwrap();
        let mut kernel = Scale::new();
        kernel.gain = 0.25;
        kernel.bypassed = true;
        let input = vec![0.75f32; 64];
        let mut left = vec![0.0f32; 64];
        let mut right = vec![1.0f32; 64];
        let events: [RenderEvent; 0] = [];

        helper
            .process_with_events(
                &mut kernel,
                &[&input[..]],
                &mut [&mut left[..], &mut right[..]],
                0,
                64,
                &events,
            )
            .unwrap();

        assert!(kernel.segments.is_empty());
        assert!(left.iter().all(|&s| s == 0.75));
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_rejects_too_many_frames() {
        let config = KernelConfig::default().with_max_frames_to_render(128);
        let helper = AudioProcessHelper::new(1, 1, &config).unwrap();
        let mut kernel = Scale::new();
        let input = vec![0.0f32; 256];
        let mut output = vec![0.0f32; 256];
        let events: [RenderEvent; 0] = [];

        let result = helper.process_with_events(
            &mut kernel,
            &[&input[..]],
            &mut [&mut output[..]],
            0,
            256,
            &events,
        );
        assert_eq!(
            result,
            Err(SpliceError::TooManyFrames {
                requested: 256,
                maximum: 128
            })
        );
        assert!(kernel.segments.is_empty());
    }

    #[test]
    fn test_rejects_bad_buffers() {
        let helper = AudioProcessHelper::new(1, 1, &KernelConfig::default()).unwrap();
        let mut kernel = Scale::new();
        let input = vec![0.0f32; 64];
        let mut short = vec![0.0f32; 32];
        let events: [RenderEvent; 0] = [];

        let result = helper.process_with_events(
            &mut kernel,
            &[&input[..]],
            &mut [&mut short[..]],
            0,
            64,
            &events,
        );
        assert_eq!(
            result,
            Err(SpliceError::BufferTooShort {
                channel: 1,
                len: 32,
                required: 64
            })
        );

        let mut output = vec![0.0f32; 64];
        let result = helper.process_with_events(
            &mut kernel,
            &[],
            &mut [&mut output[..]],
            0,
            64,
            &events,
        );
        assert!(matches!(result, Err(SpliceError::ChannelMismatch { .. })));
    }

    #[test]
    fn test_rejects_too_many_channels() {
        let result = AudioProcessHelper::new(MAX_CHANNELS + 1, 2, &KernelConfig::default());
        assert!(matches!(result, Err(SpliceError::InvalidConfiguration(_))));
    }

    struct Ticks {
        segments: Vec<(SampleTime, FrameCount)>,
    }

    impl MidiKernel for Ticks {
        fn process(&mut self, segment_start: SampleTime, frame_count: FrameCount) {
            self.segments.push((segment_start, frame_count));
        }

        fn handle_one_event(&mut self, _now: SampleTime, _event: &RenderEvent<'_>) {}
    }

    #[test]
    fn test_midi_helper_segments() {
        let helper = MidiProcessHelper::new(&KernelConfig::default()).unwrap();
        let mut kernel = Ticks {
            segments: Vec::new(),
        };
        let events = [RenderEvent::parameter(1010, 0, 1.0)];

        let stats = helper
            .process_with_events(&mut kernel, 1000, 64, &events)
            .unwrap();

        assert_eq!(kernel.segments, vec![(1000, 10), (1010, 54)]);
        assert_eq!(stats.events, 1);
        assert!(helper
            .process_with_events(&mut kernel, 0, 4096, &events)
            .is_err());
    }
}
