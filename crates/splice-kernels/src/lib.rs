//! Reference kernels built on splice.
//!
//! - [`GainKernel`] - audio effect with one sample-accurate, rampable gain
//! - [`NoteGateKernel`] - MIDI generator that holds one note on while enabled
//!
//! Both are driven through the render helpers:
//!
//! ```ignore
//! use splice::prelude::*;
//! use splice_kernels::GainKernel;
//!
//! let config = KernelConfig::new(48_000.0);
//! let mut kernel = GainKernel::new();
//! kernel.initialize(&config)?;
//! let helper = AudioProcessHelper::new(2, 2, &config)?;
//!
//! // On the render thread:
//! helper.process_with_events(&mut kernel, &inputs, &mut outputs, now, frames, &events)?;
//! ```

pub mod gain;
pub mod note_gate;

pub use gain::{GainAddress, GainKernel, GAIN_PARAMETERS};
pub use note_gate::{
    NoteGateAddress, NoteGateKernel, NoteState, NoteTransition, NOTE_GATE_PARAMETERS, NO_NOTE,
};
