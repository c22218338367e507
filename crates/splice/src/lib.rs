//! # Splice
//!
//! Sample-accurate audio and MIDI kernels for Rust.
//!
//! Splice splits every host render call at the sample times of its scheduled
//! events, so parameter changes and MIDI take effect on exactly the frame
//! they were scheduled for.
//!
//! ## Architecture
//!
//! ```text
//! Host render call (frames, start time, buffers, events)
//!        ↓
//! AudioProcessHelper / MidiProcessHelper (render guard)
//!        ↓
//! Segmenter (split at event times)
//!        ↓
//! Your kernel: process(segment) / handle_one_event(event)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use splice::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
//! pub enum Address {
//!     #[address = 0]
//!     Gain,
//! }
//!
//! struct MyGain { params: ParameterTable<Address, 1> }
//!
//! impl AudioKernel for MyGain {
//!     fn process(&mut self, buffer: &mut Buffer, _segment_start: SampleTime) {
//!         let gain = self.params.current(Address::Gain);
//!         for (input, output) in buffer.zip_channels() {
//!             for (i, o) in input.iter().zip(output.iter_mut()) {
//!                 *o = *i * gain;
//!             }
//!         }
//!     }
//!
//!     fn handle_one_event(&mut self, _now: SampleTime, event: &RenderEvent) {
//!         if let RenderEventKind::Parameter(p) = event.kind {
//!             self.params.set_raw(p.address, p.value);
//!         }
//!     }
//! }
//! ```

// Re-export sub-crates
pub use splice_core as core;

// Re-export derive macros when feature is enabled
#[cfg(feature = "derive")]
pub use splice_macros::ParameterAddress;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use splice::prelude::*;
/// ```
pub mod prelude {
    pub use splice_core::{
        // Kernels and drivers
        AudioKernel, AudioProcessHelper, MidiKernel, MidiProcessHelper, SegmentProcessor,
        process_with_events, ProcessingCursor, RenderStats,
        // Buffers and samples
        Buffer, Sample,
        // Events
        MidiEventListEvent, MidiMessage, ParameterEvent, ParameterRampEvent, RenderEvent,
        RenderEventKind,
        // MIDI
        MidiEventList, MidiEventPacket, MidiOutput, MidiProtocol, MAX_VELOCITY,
        // Musical context
        MusicalContext, MusicalPosition, NoMusicalContext,
        // Parameters
        ParameterSpec, ParameterTable, Smoother, SmoothingStyle,
        // Configuration and errors
        KernelConfig, SpliceError, SpliceResult,
        // Common types
        FrameCount, ParameterValue, RawAddress, SampleTime,
    };

    // The trait is needed even when the derive is off
    pub use splice_core::parameters::ParameterAddress;

    #[cfg(feature = "derive")]
    pub use splice_macros::ParameterAddress;
}
