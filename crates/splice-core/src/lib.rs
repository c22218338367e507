//! # splice-core
//!
//! Sample-accurate render-event dispatch for real-time audio and MIDI
//! kernels.
//!
//! A host render call supplies a frame count, a start time, buffers and a
//! time-ordered list of scheduled events. This crate splits the call at
//! event times so every event takes effect on exactly the frame it was
//! scheduled for, and hands each piece to a kernel.
//!
//! ## Main Traits
//!
//! - [`AudioKernel`] - Audio-in, audio-out processor
//! - [`MidiKernel`] - MIDI-only processor
//! - [`SegmentProcessor`] - Low-level seam driven by [`process_with_events`]
//! - [`ParameterAddress`] - Closed set of parameter addresses
//! - [`MidiOutput`] - Destination for emitted MIDI
//! - [`MusicalContext`] - Host tempo and position
//!
//! ## Types
//!
//! - [`RenderEvent`] - Scheduled event with its payload
//! - [`Buffer`] - Per-segment view of the host's audio buffers
//! - [`ParameterTable`] - Goal and ramping values of a kernel's parameters
//! - [`AudioProcessHelper`] / [`MidiProcessHelper`] - Host-facing render guards
//! - [`KernelConfig`] - Sample rate, frame limit and MIDI protocol
//! - [`SpliceError`] - Error types

pub mod buffer;
pub mod config;
pub mod error;
pub mod event;
pub mod midi;
pub mod musical_context;
pub mod parameters;
pub mod render;
pub mod sample;
pub mod segmenter;
pub mod smoothing;
pub mod types;

// Re-exports for convenience
pub use buffer::Buffer;
pub use config::{KernelConfig, DEFAULT_MAX_FRAMES_TO_RENDER, DEFAULT_SAMPLE_RATE};
pub use error::{SpliceError, SpliceResult};
pub use event::{
    MidiEventListEvent, MidiMessage, ParameterEvent, ParameterRampEvent, RenderEvent,
    RenderEventKind,
};
pub use midi::{
    decode_note, midi1_channel_voice, midi1_to_ump, midi2_note_off, midi2_note_on,
    MidiEventList, MidiEventPacket, MidiOutput, MidiProtocol, NoteMessage, MAX_PACKET_WORDS,
    MAX_VELOCITY,
};
pub use musical_context::{MusicalContext, MusicalPosition, NoMusicalContext};
pub use parameters::{ParameterAddress, ParameterSpec, ParameterTable};
pub use render::{AudioKernel, AudioProcessHelper, MidiKernel, MidiProcessHelper};
pub use sample::Sample;
pub use segmenter::{process_with_events, ProcessingCursor, RenderStats, SegmentProcessor};
pub use smoothing::{Smoother, SmoothingStyle};
pub use types::*;
