//! Kernel parameter state.
//!
//! A kernel's parameters are named by a closed address enum implementing
//! [`ParameterAddress`] (usually via `#[derive(ParameterAddress)]`) and
//! described by one [`ParameterSpec`] each. [`ParameterTable`] holds the
//! values: one [`Smoother`] per parameter, so every parameter has a goal
//! value and an audible current value that may be ramping toward it.
//!
//! Values are stored as given. Ranges in [`ParameterSpec`] are metadata for
//! the host and are not enforced here.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
//! pub enum Address {
//!     #[address = 0]
//!     Gain,
//! }
//!
//! const SPECS: [ParameterSpec; 1] = [ParameterSpec::new("gain", "Gain")
//!     .with_range(0.0, 1.0)
//!     .with_default(1.0)];
//!
//! let mut table = ParameterTable::<Address, 1>::new(SPECS);
//! table.set_raw(0, 0.5);
//! assert_eq!(table.goal(Address::Gain), 0.5);
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::smoothing::{Smoother, SmoothingStyle};
use crate::types::{FrameCount, ParameterValue, RawAddress};

// =============================================================================
// Addresses
// =============================================================================

/// Closed set of parameter addresses for one kernel.
///
/// `index()` must be dense: `0..COUNT`, in the order of `ALL`.
pub trait ParameterAddress: Copy + Eq + fmt::Debug + 'static {
    /// Number of parameters.
    const COUNT: usize;

    /// Every address, in index order.
    const ALL: &'static [Self];

    /// Map a host address to a parameter. Unknown addresses return `None`.
    fn from_raw(raw: RawAddress) -> Option<Self>;

    /// The host address.
    fn raw(self) -> RawAddress;

    /// Position of this parameter in `ALL`.
    fn index(self) -> usize;

    /// Stable string identifier (e.g. `"midiNoteNumber"`).
    fn identifier(self) -> &'static str;
}

// =============================================================================
// Specs
// =============================================================================

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Stable identifier.
    pub identifier: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Lowest value hosts should offer.
    pub min: ParameterValue,
    /// Highest value hosts should offer.
    pub max: ParameterValue,
    /// Value at construction and after a reset.
    pub default: ParameterValue,
    /// How plain value changes reach the audible value.
    pub smoothing: SmoothingStyle,
}

impl ParameterSpec {
    /// Create a 0..1 parameter defaulting to 0 with no smoothing.
    pub const fn new(identifier: &'static str, name: &'static str) -> Self {
        Self {
            identifier,
            name,
            min: 0.0,
            max: 1.0,
            default: 0.0,
            smoothing: SmoothingStyle::None,
        }
    }

    /// Set the value range.
    pub const fn with_range(mut self, min: ParameterValue, max: ParameterValue) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the default value.
    pub const fn with_default(mut self, default: ParameterValue) -> Self {
        self.default = default;
        self
    }

    /// Set the smoothing applied to immediate changes.
    pub const fn with_smoothing(mut self, smoothing: SmoothingStyle) -> Self {
        self.smoothing = smoothing;
        self
    }
}

// =============================================================================
// Table
// =============================================================================

/// Values of all parameters of one kernel.
///
/// `N` must equal `A::COUNT`.
#[derive(Debug, Clone)]
pub struct ParameterTable<A: ParameterAddress, const N: usize> {
    specs: [ParameterSpec; N],
    smoothers: [Smoother; N],
    _address: PhantomData<A>,
}

impl<A: ParameterAddress, const N: usize> ParameterTable<A, N> {
    /// Create a table with every parameter at its default.
    pub fn new(specs: [ParameterSpec; N]) -> Self {
        debug_assert_eq!(N, A::COUNT, "one spec per parameter address");
        let smoothers = std::array::from_fn(|i| {
            let mut smoother = Smoother::new(specs[i].smoothing);
            smoother.reset(f64::from(specs[i].default));
            smoother
        });
        Self {
            specs,
            smoothers,
            _address: PhantomData,
        }
    }

    /// Update the sample rate used by time-based smoothing.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        for smoother in &mut self.smoothers {
            smoother.set_sample_rate(sample_rate);
        }
    }

    /// Spec of a parameter.
    pub fn spec(&self, address: A) -> &ParameterSpec {
        &self.specs[address.index()]
    }

    /// All specs, in index order.
    pub fn specs(&self) -> &[ParameterSpec; N] {
        &self.specs
    }

    // =========================================================================
    // Setting
    // =========================================================================

    /// Set a parameter's goal using its smoothing style.
    pub fn set(&mut self, address: A, value: ParameterValue) {
        self.smoothers[address.index()].set_target(f64::from(value));
    }

    /// Set by host address. Returns false (and changes nothing) if the
    /// address is unknown.
    pub fn set_raw(&mut self, raw: RawAddress, value: ParameterValue) -> bool {
        match A::from_raw(raw) {
            Some(address) => {
                self.set(address, value);
                true
            }
            None => false,
        }
    }

    /// Ramp a parameter linearly to `end_value` over `frames` frames.
    pub fn ramp(&mut self, address: A, end_value: ParameterValue, frames: FrameCount) {
        self.smoothers[address.index()].ramp_to(f64::from(end_value), frames);
    }

    /// Ramp by host address. Returns false if the address is unknown.
    pub fn ramp_raw(&mut self, raw: RawAddress, end_value: ParameterValue, frames: FrameCount) -> bool {
        match A::from_raw(raw) {
            Some(address) => {
                self.ramp(address, end_value, frames);
                true
            }
            None => false,
        }
    }

    /// Put every parameter back at its default with no ramp in flight.
    pub fn reset_to_defaults(&mut self) {
        for (smoother, spec) in self.smoothers.iter_mut().zip(&self.specs) {
            smoother.reset(f64::from(spec.default));
        }
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// The goal value: what was last set, never a ramp intermediate.
    #[inline]
    pub fn goal(&self, address: A) -> ParameterValue {
        self.smoothers[address.index()].target() as ParameterValue
    }

    /// Goal value by host address, or `None` if the address is unknown.
    pub fn goal_raw(&self, raw: RawAddress) -> Option<ParameterValue> {
        A::from_raw(raw).map(|address| self.goal(address))
    }

    /// The audible value at the current ramp position.
    #[inline]
    pub fn current(&self, address: A) -> ParameterValue {
        self.smoothers[address.index()].current() as ParameterValue
    }

    /// Returns true while the parameter is ramping.
    #[inline]
    pub fn is_ramping(&self, address: A) -> bool {
        self.smoothers[address.index()].is_smoothing()
    }

    /// Direct access to a parameter's smoother.
    #[inline]
    pub fn smoother(&self, address: A) -> &Smoother {
        &self.smoothers[address.index()]
    }

    // =========================================================================
    // Advancing
    // =========================================================================

    /// Advance every ramp by `frames` frames.
    pub fn skip(&mut self, frames: usize) {
        for smoother in &mut self.smoothers {
            smoother.skip(frames);
        }
    }
}
