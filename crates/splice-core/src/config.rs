//! Kernel render configuration.
//!
//! [`KernelConfig`] carries what a kernel needs to know before it can render:
//! the sample rate, the largest block the host may ask for, and the MIDI
//! protocol it speaks.
//!
//! # Example
//!
//! ```ignore
//! use splice_core::{KernelConfig, MidiProtocol};
//!
//! pub static CONFIG: KernelConfig = KernelConfig::new(48_000.0)
//!     .with_max_frames_to_render(512)
//!     .with_midi_protocol(MidiProtocol::Midi2);
//! ```

use crate::error::{SpliceError, SpliceResult};
use crate::midi::MidiProtocol;
use crate::types::FrameCount;

/// Default sample rate used before the host negotiates one.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Default upper bound on frames per render call.
pub const DEFAULT_MAX_FRAMES_TO_RENDER: FrameCount = 1024;

/// Render configuration shared by all kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,

    /// Largest frame count a single render call may request.
    pub max_frames_to_render: FrameCount,

    /// Protocol used for MIDI the kernel emits.
    pub midi_protocol: MidiProtocol,
}

impl KernelConfig {
    /// Create a configuration for the given sample rate with default limits.
    pub const fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            max_frames_to_render: DEFAULT_MAX_FRAMES_TO_RENDER,
            midi_protocol: MidiProtocol::Midi2,
        }
    }

    /// Set the maximum number of frames per render call.
    pub const fn with_max_frames_to_render(mut self, frames: FrameCount) -> Self {
        self.max_frames_to_render = frames;
        self
    }

    /// Set the MIDI protocol.
    pub const fn with_midi_protocol(mut self, protocol: MidiProtocol) -> Self {
        self.midi_protocol = protocol;
        self
    }

    /// Check that the configuration can be rendered with.
    pub fn validate(&self) -> SpliceResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(SpliceError::InvalidConfiguration(format!(
                "sample rate must be positive and finite, got {}",
                self.sample_rate
            )));
        }
        if self.max_frames_to_render == 0 {
            return Err(SpliceError::InvalidConfiguration(
                "maximum frames to render must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.max_frames_to_render, 1024);
        assert_eq!(config.midi_protocol, MidiProtocol::Midi2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        assert!(KernelConfig::new(0.0).validate().is_err());
        assert!(KernelConfig::new(-48_000.0).validate().is_err());
        assert!(KernelConfig::new(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_frame_limit() {
        let config = KernelConfig::new(48_000.0).with_max_frames_to_render(0);
        assert!(matches!(
            config.validate(),
            Err(SpliceError::InvalidConfiguration(_))
        ));
    }
}
