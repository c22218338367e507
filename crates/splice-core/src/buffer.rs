//! Per-segment audio buffer views.
//!
//! A render call is split into segments at event boundaries. For every
//! segment the render helper builds a [`Buffer`] whose channel slices start
//! at the segment's frame offset inside the host buffers and span exactly the
//! segment's length. Kernels therefore always see index 0 as "the first frame
//! of this segment" and never do offset arithmetic themselves.
//!
//! # Real-Time Safety
//!
//! Channel storage is a fixed-size array on the stack. Building a view never
//! allocates and never copies audio.
//!
//! # Example
//!
//! ```ignore
//! fn process(&mut self, buffer: &mut Buffer<S>, _segment_start: SampleTime) {
//!     let gain = S::from_f64(self.gain);
//!     for (input, output) in buffer.zip_channels() {
//!         for (i, o) in input.iter().zip(output.iter_mut()) {
//!             *o = *i * gain;
//!         }
//!     }
//! }
//! ```

use crate::sample::Sample;
use crate::types::MAX_CHANNELS;

/// Non-owning view of one segment of the host's input and output buffers.
///
/// The `'a` lifetime ties the view to the host's audio data; a view never
/// outlives the render call that created it. Channels beyond
/// [`MAX_CHANNELS`] are ignored.
pub struct Buffer<'a, S: Sample = f32> {
    inputs: [Option<&'a [S]>; MAX_CHANNELS],
    // &mut is not Copy, so this one is built with from_fn
    outputs: [Option<&'a mut [S]>; MAX_CHANNELS],
    num_input_channels: usize,
    num_output_channels: usize,
    num_frames: usize,
}

impl<'a, S: Sample> Buffer<'a, S> {
    /// Create a view from channel slices.
    ///
    /// Every slice must hold at least `num_frames` samples; accessors clip to
    /// `num_frames`.
    #[inline]
    pub fn new(
        inputs: impl IntoIterator<Item = &'a [S]>,
        outputs: impl IntoIterator<Item = &'a mut [S]>,
        num_frames: usize,
    ) -> Self {
        let mut input_arr: [Option<&'a [S]>; MAX_CHANNELS] = [None; MAX_CHANNELS];
        let mut num_input_channels = 0;
        for (i, slice) in inputs.into_iter().take(MAX_CHANNELS).enumerate() {
            input_arr[i] = Some(slice);
            num_input_channels = i + 1;
        }

        let mut output_arr: [Option<&'a mut [S]>; MAX_CHANNELS] = std::array::from_fn(|_| None);
        let mut num_output_channels = 0;
        for (i, slice) in outputs.into_iter().take(MAX_CHANNELS).enumerate() {
            output_arr[i] = Some(slice);
            num_output_channels = i + 1;
        }

        Self {
            inputs: input_arr,
            outputs: output_arr,
            num_input_channels,
            num_output_channels,
            num_frames,
        }
    }

    /// Create a view of `num_frames` frames starting at `frame_offset` in the
    /// host buffers.
    ///
    /// The caller guarantees every channel holds `frame_offset + num_frames`
    /// samples (the render helper checks this once per render call).
    #[inline]
    pub fn segment<'host: 'a>(
        inputs: &'a [&'a [S]],
        outputs: &'a mut [&'host mut [S]],
        frame_offset: usize,
        num_frames: usize,
    ) -> Self {
        let end = frame_offset + num_frames;
        Self::new(
            inputs.iter().map(|ch| &ch[frame_offset..end]),
            outputs.iter_mut().map(|ch| &mut ch[frame_offset..end]),
            num_frames,
        )
    }

    // =========================================================================
    // Info
    // =========================================================================

    /// Number of frames in this segment.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Number of input channels.
    #[inline]
    pub fn num_input_channels(&self) -> usize {
        self.num_input_channels
    }

    /// Number of output channels.
    #[inline]
    pub fn num_output_channels(&self) -> usize {
        self.num_output_channels
    }

    // =========================================================================
    // Channel Access
    // =========================================================================

    /// Get an input channel. Empty if the channel doesn't exist.
    #[inline]
    pub fn input(&self, channel: usize) -> &[S] {
        self.inputs
            .get(channel)
            .and_then(|opt| opt.as_ref())
            .map(|ch| &ch[..self.num_frames])
            .unwrap_or(&[])
    }

    /// Get an output channel, or `None` if it doesn't exist.
    #[inline]
    pub fn output(&mut self, channel: usize) -> Option<&mut [S]> {
        let n = self.num_frames;
        self.outputs
            .get_mut(channel)
            .and_then(|opt| opt.as_mut())
            .map(|ch| &mut ch[..n])
    }

    /// Iterate over paired (input, output) channels.
    ///
    /// Only yields channels present on both sides.
    #[inline]
    pub fn zip_channels(&mut self) -> impl Iterator<Item = (&[S], &mut [S])> + use<'_, 'a, S> {
        let n = self.num_frames;
        let num_pairs = self.num_input_channels.min(self.num_output_channels);
        self.inputs[..num_pairs]
            .iter()
            .zip(self.outputs[..num_pairs].iter_mut())
            .filter_map(move |(i_opt, o_opt)| match (i_opt.as_ref(), o_opt.as_mut()) {
                (Some(i), Some(o)) => Some((&i[..n], &mut o[..n])),
                _ => None,
            })
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Copy inputs to outputs for every paired channel and silence any output
    /// channel without a matching input.
    ///
    /// This is what a bypassed effect produces.
    pub fn pass_through(&mut self) {
        let n = self.num_frames;
        let num_pairs = self.num_input_channels.min(self.num_output_channels);
        for ch in 0..self.num_output_channels {
            let Some(output) = self.outputs[ch].as_mut() else {
                continue;
            };
            match self.inputs[ch].as_ref() {
                Some(input) if ch < num_pairs => output[..n].copy_from_slice(&input[..n]),
                _ => output[..n].fill(S::ZERO),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_offsets_into_host_buffers() {
        let input: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let inputs: [&[f32]; 1] = [&input[..]];
        let mut output = vec![0.0f32; 8];
        let mut outputs: [&mut [f32]; 1] = [&mut output[..]];

        {
            let mut buffer = Buffer::segment(&inputs, &mut outputs, 3, 2);
            assert_eq!(buffer.num_frames(), 2);
            assert_eq!(buffer.input(0), &[3.0, 4.0]);
            for (i, o) in buffer.zip_channels() {
                o.copy_from_slice(i);
            }
        }

        assert_eq!(output, vec![0.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pass_through_silences_unpaired_outputs() {
        let left = [0.5f32; 4];
        let mut out_left = [0.0f32; 4];
        let mut out_right = [1.0f32; 4];

        let mut buffer = Buffer::new(
            [&left[..]],
            [&mut out_left[..], &mut out_right[..]],
            4,
        );
        buffer.pass_through();

        assert_eq!(out_left, [0.5; 4]);
        assert_eq!(out_right, [0.0; 4]);
    }

    #[test]
    fn test_missing_channels() {
        let mut buffer: Buffer<f64> = Buffer::new(std::iter::empty(), std::iter::empty(), 16);
        assert!(buffer.input(0).is_empty());
        assert!(buffer.output(0).is_none());
        assert_eq!(buffer.zip_channels().count(), 0);
    }
}
