//! Parameter ramping.
//!
//! [`Smoother`] holds a parameter's audible value and moves it toward the
//! goal value sample by sample. There are two ways a ramp starts:
//!
//! - [`Smoother::set_target()`] uses the parameter's configured
//!   [`SmoothingStyle`] (instant for `None`, a fixed-time linear ramp for
//!   `Linear`).
//! - [`Smoother::ramp_to()`] starts a linear ramp of an explicit length in
//!   samples. This is what host-scheduled ramp events use.
//!
//! Setting a goal never touches audio. The ramp is realised lazily by the
//! kernel's `process`, one [`next()`](Smoother::next) per frame or one
//! [`skip()`](Smoother::skip) per segment.
//!
//! ```ignore
//! let mut smoother = Smoother::new(SmoothingStyle::Linear(10.0));
//! smoother.set_sample_rate(44100.0);
//! smoother.reset(1.0);
//! smoother.set_target(0.5);
//! let value = smoother.next();  // Per-sample
//! ```
//!
//! `Smoother` takes `&mut self` to advance and belongs to the render thread.

/// Smoothing applied when a new goal is set without an explicit ramp.
///
/// The `f64` parameter is the ramp time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SmoothingStyle {
    /// Value changes instantly.
    #[default]
    None,

    /// Linear interpolation reaching the goal after the given time.
    Linear(f64),
}

/// A ramping parameter value.
#[derive(Debug, Clone)]
pub struct Smoother {
    style: SmoothingStyle,
    sample_rate: f64,

    current: f64,
    target: f64,

    step_size: f64,       // increment per sample
    steps_remaining: u32, // samples until target reached
}

impl Smoother {
    /// Create a smoother with the given style.
    ///
    /// `Linear` styles need a sample rate via
    /// [`set_sample_rate()`](Self::set_sample_rate) before they ramp.
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            sample_rate: 0.0,
            current: 0.0,
            target: 0.0,
            step_size: 0.0,
            steps_remaining: 0,
        }
    }

    /// Get the smoothing style.
    pub fn style(&self) -> SmoothingStyle {
        self.style
    }

    /// Set the sample rate used to convert ramp times to samples.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Set a new goal using the configured style.
    pub fn set_target(&mut self, target: f64) {
        match self.style {
            SmoothingStyle::None => self.reset(target),
            SmoothingStyle::Linear(ms) => {
                if (self.target - target).abs() < 1e-10 {
                    return;
                }
                let samples = (ms * self.sample_rate / 1000.0) as u32;
                self.ramp_to(target, samples);
            }
        }
    }

    /// Ramp linearly from the current value to `target` over `samples` samples.
    ///
    /// A zero-length ramp jumps immediately.
    pub fn ramp_to(&mut self, target: f64, samples: u32) {
        if samples == 0 {
            self.reset(target);
            return;
        }
        self.target = target;
        self.steps_remaining = samples;
        self.step_size = (target - self.current) / samples as f64;
    }

    /// Jump to a value with no ramp.
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.steps_remaining = 0;
        self.step_size = 0.0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next(&mut self) -> f64 {
        if self.steps_remaining > 0 {
            self.current += self.step_size;
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// The goal value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Advance by `samples` samples in one step.
    ///
    /// Lands on exactly the value `samples` calls to [`next()`](Self::next)
    /// would have produced.
    pub fn skip(&mut self, samples: usize) {
        let skip_count = u32::try_from(samples)
            .unwrap_or(u32::MAX)
            .min(self.steps_remaining);
        if skip_count > 0 {
            self.current += self.step_size * skip_count as f64;
            self.steps_remaining -= skip_count;
            if self.steps_remaining == 0 {
                self.current = self.target;
            }
        }
    }

    /// Returns true while a ramp is in progress.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.steps_remaining > 0
    }

    /// Samples left until the goal is reached.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(SmoothingStyle::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_smoothing() {
        let mut s = Smoother::new(SmoothingStyle::None);
        s.set_sample_rate(44100.0);
        s.reset(0.0);
        s.set_target(1.0);
        assert!((s.next() - 1.0).abs() < 1e-10);
        assert!(!s.is_smoothing());
    }

    #[test]
    fn test_linear_reaches_target() {
        let mut s = Smoother::new(SmoothingStyle::Linear(10.0)); // 10ms
        s.set_sample_rate(1000.0); // 1 sample per ms
        s.reset(0.0);
        s.set_target(1.0);

        for _ in 0..10 {
            s.next();
        }
        assert!((s.current() - 1.0).abs() < 1e-10);
        assert!(!s.is_smoothing());
    }

    #[test]
    fn test_explicit_ramp() {
        let mut s = Smoother::new(SmoothingStyle::None);
        s.reset(1.0);
        s.ramp_to(0.0, 4);

        assert!((s.target() - 0.0).abs() < 1e-10);
        assert!((s.next() - 0.75).abs() < 1e-10);
        assert!((s.next() - 0.5).abs() < 1e-10);
        assert_eq!(s.steps_remaining(), 2);
    }

    #[test]
    fn test_instant_goal_cancels_ramp() {
        let mut s = Smoother::new(SmoothingStyle::None);
        s.reset(0.0);
        s.ramp_to(1.0, 100);
        s.next();
        s.set_target(0.25);
        assert!(!s.is_smoothing());
        assert!((s.next() - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_skip_matches_next() {
        let mut stepped = Smoother::new(SmoothingStyle::None);
        stepped.reset(0.0);
        stepped.ramp_to(1.0, 10);
        let mut skipped = stepped.clone();

        for _ in 0..5 {
            stepped.next();
        }
        skipped.skip(5);
        assert!((stepped.current() - skipped.current()).abs() < 1e-10);
        assert!((skipped.current() - 0.5).abs() < 1e-10);

        skipped.skip(500);
        assert!((skipped.current() - 1.0).abs() < 1e-10);
        assert!(!skipped.is_smoothing());
    }
}
