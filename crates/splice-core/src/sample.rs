//! Sample type abstraction for f32/f64 audio processing.
//!
//! Kernels are written once against [`Sample`] and monomorphized for both
//! precisions.

use std::ops::{Add, Mul, Sub};

/// Trait for audio sample types (f32, f64).
///
/// Only the operations the render path needs. Everything inlines.
///
/// # Example
///
/// ```ignore
/// fn apply_gain<S: Sample>(buffer: &mut Buffer<S>, gain: f64) {
///     let gain = S::from_f64(gain);
///     for (input, output) in buffer.zip_channels() {
///         for (i, o) in input.iter().zip(output.iter_mut()) {
///             *o = *i * gain;
///         }
///     }
/// }
/// ```
pub trait Sample:
    Copy
    + Default
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + PartialOrd
{
    /// Zero value (0.0).
    const ZERO: Self;

    /// Unit value (1.0).
    const ONE: Self;

    /// Convert from f32.
    fn from_f32(value: f32) -> Self;

    /// Convert from f64.
    fn from_f64(value: f64) -> Self;

    /// Convert to f64.
    fn to_f64(self) -> f64;
}

impl Sample for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        value as f64
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}
