//! Error types for splice.
//!
//! Errors only come out of the non-real-time lifecycle (kernel
//! initialization) and the host-facing render guard. The segmenter and the
//! kernels themselves are infallible.

use std::fmt;

use crate::types::FrameCount;

/// Errors that can occur while configuring or driving a kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum SpliceError {
    /// Kernel configuration was rejected (sample rate, frame limit, ...).
    InvalidConfiguration(String),
    /// A render call asked for more frames than the kernel was prepared for.
    TooManyFrames {
        requested: FrameCount,
        maximum: FrameCount,
    },
    /// The host supplied a different number of channels than was negotiated.
    ChannelMismatch { expected: usize, actual: usize },
    /// A channel slice cannot hold the requested number of frames.
    BufferTooShort {
        channel: usize,
        len: usize,
        required: usize,
    },
}

impl fmt::Display for SpliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::TooManyFrames { requested, maximum } => write!(
                f,
                "Too many frames to render: {} requested, maximum is {}",
                requested, maximum
            ),
            Self::ChannelMismatch { expected, actual } => write!(
                f,
                "Channel count mismatch: expected {}, got {}",
                expected, actual
            ),
            Self::BufferTooShort {
                channel,
                len,
                required,
            } => write!(
                f,
                "Buffer too short: channel {} holds {} frames, {} required",
                channel, len, required
            ),
        }
    }
}

impl std::error::Error for SpliceError {}

/// Result type for splice operations.
pub type SpliceResult<T> = Result<T, SpliceError>;
