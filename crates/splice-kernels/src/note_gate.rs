//! Note-gate MIDI kernel.
//!
//! Holds at most one note on. Two parameters drive it:
//!
//! | Address | Identifier | Meaning |
//! |---------|------------|---------|
//! | 0 | `sendNote` | Non-zero keeps a note sounding |
//! | 1 | `midiNoteNumber` | Note to sound (truncated to an integer) |
//!
//! The gate is evaluated once at the start of every processed segment, so a
//! parameter change scheduled at sample `t` produces its MIDI at exactly `t`.
//! Incoming MIDI is forwarded to the output unchanged.
//!
//! # Example
//!
//! ```ignore
//! let mut kernel = NoteGateKernel::new(|time, cable, list: &MidiEventList| {
//!     host_midi_out(time, cable, list);
//! });
//! kernel.set_parameter(1, 60.0);
//! kernel.set_parameter(0, 1.0);
//! ```

use std::slice;

use splice::core::midi::{midi1_channel_voice, midi1_to_ump, midi2_note_off, midi2_note_on, status};
use splice::prelude::*;

/// MIDI 1.0 note-on velocity used when the kernel speaks MIDI 1.0.
const MIDI1_MAX_VELOCITY: u8 = 0x7F;

/// Note number meaning "no note yet".
pub const NO_NOTE: u8 = 255;

// =============================================================================
// Parameters
// =============================================================================

/// Parameter addresses of [`NoteGateKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
pub enum NoteGateAddress {
    #[address = 0]
    SendNote,
    #[address = 1]
    MidiNoteNumber,
}

/// Parameter specs of [`NoteGateKernel`], in address order.
pub const NOTE_GATE_PARAMETERS: [ParameterSpec; 2] = [
    ParameterSpec::new("sendNote", "Send Note")
        .with_range(0.0, 1.0)
        .with_default(0.0),
    ParameterSpec::new("midiNoteNumber", "MIDI Note Number")
        .with_range(0.0, 127.0)
        .with_default(60.0),
];

// =============================================================================
// Note State
// =============================================================================

/// MIDI emitted by one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTransition {
    /// Nothing to send.
    None,
    /// Note on for the given note.
    On(u8),
    /// Note off for `off`, then note on for `on`.
    Retrigger { off: u8, on: u8 },
    /// Note off for the given note.
    Off(u8),
}

/// Gate state.
///
/// `should_send_note_on` and `next_note_to_send` follow the parameters;
/// `note_is_currently_on` and `last_sent_note` follow what was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteState {
    pub should_send_note_on: bool,
    pub note_is_currently_on: bool,
    pub last_sent_note: u8,
    pub next_note_to_send: u8,
}

impl Default for NoteState {
    fn default() -> Self {
        Self {
            should_send_note_on: false,
            note_is_currently_on: false,
            last_sent_note: NO_NOTE,
            next_note_to_send: NO_NOTE,
        }
    }
}

impl NoteState {
    /// Decide what to send and record it as sent.
    pub fn evaluate(&mut self) -> NoteTransition {
        match (self.should_send_note_on, self.note_is_currently_on) {
            (true, false) => {
                self.note_is_currently_on = true;
                self.last_sent_note = self.next_note_to_send;
                NoteTransition::On(self.next_note_to_send)
            }
            (true, true) if self.last_sent_note != self.next_note_to_send => {
                let off = self.last_sent_note;
                self.last_sent_note = self.next_note_to_send;
                NoteTransition::Retrigger {
                    off,
                    on: self.next_note_to_send,
                }
            }
            (false, true) => {
                self.note_is_currently_on = false;
                NoteTransition::Off(self.last_sent_note)
            }
            _ => NoteTransition::None,
        }
    }
}

// =============================================================================
// Kernel
// =============================================================================

/// One-note MIDI gate.
///
/// `O` receives everything the kernel emits; `C` is asked for the host's
/// musical position once per processed segment.
pub struct NoteGateKernel<O: MidiOutput, C: MusicalContext = NoMusicalContext> {
    parameters: ParameterTable<NoteGateAddress, 2>,
    state: NoteState,
    bypassed: bool,
    config: KernelConfig,
    output: O,
    context: C,
    musical_position: Option<MusicalPosition>,
}

impl<O: MidiOutput> NoteGateKernel<O> {
    /// Create a kernel without a musical context.
    pub fn new(output: O) -> Self {
        Self::with_context(output, NoMusicalContext)
    }
}

impl<O: MidiOutput, C: MusicalContext> NoteGateKernel<O, C> {
    /// Create a kernel that queries `context` while processing.
    ///
    /// The gate starts from the parameter defaults: off, note 60.
    pub fn with_context(output: O, context: C) -> Self {
        let mut kernel = Self {
            parameters: ParameterTable::new(NOTE_GATE_PARAMETERS),
            state: NoteState::default(),
            bypassed: false,
            config: KernelConfig::default(),
            output,
            context,
            musical_position: None,
        };
        for &address in NoteGateAddress::ALL {
            let default = kernel.parameters.spec(address).default;
            kernel.set_parameter(address.raw(), default);
        }
        kernel
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Prepare for rendering with `config`.
    pub fn initialize(&mut self, config: &KernelConfig) -> SpliceResult<()> {
        config.validate().inspect_err(|e| {
            log::error!("Note gate initialization failed: {}", e);
        })?;
        self.config = *config;
        self.parameters.set_sample_rate(config.sample_rate);
        log::debug!(
            "Note gate initialized: {} Hz, up to {} frames, {:?}",
            config.sample_rate,
            config.max_frames_to_render,
            config.midi_protocol
        );
        Ok(())
    }

    /// Release render resources.
    pub fn deinitialize(&mut self) {
        log::debug!("Note gate deinitialized");
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Largest frame count per render call.
    pub fn maximum_frames_to_render(&self) -> FrameCount {
        self.config.max_frames_to_render
    }

    /// Change the largest frame count per render call.
    pub fn set_maximum_frames_to_render(&mut self, frames: FrameCount) {
        self.config.max_frames_to_render = frames;
    }

    /// Protocol of the note messages this kernel emits.
    pub fn midi_protocol(&self) -> MidiProtocol {
        self.config.midi_protocol
    }

    // =========================================================================
    // Parameters and Bypass
    // =========================================================================

    /// Set a parameter by host address. Unknown addresses are ignored.
    pub fn set_parameter(&mut self, address: RawAddress, value: ParameterValue) {
        let Some(parameter) = NoteGateAddress::from_raw(address) else {
            return;
        };
        self.parameters.set(parameter, value);
        match parameter {
            NoteGateAddress::SendNote => self.state.should_send_note_on = value != 0.0,
            NoteGateAddress::MidiNoteNumber => self.state.next_note_to_send = value as u8,
        }
    }

    /// Goal value of a parameter, or 0 for an unknown address.
    pub fn get_parameter(&self, address: RawAddress) -> ParameterValue {
        self.parameters.goal_raw(address).unwrap_or(0.0)
    }

    pub fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Gate state.
    pub fn note_state(&self) -> &NoteState {
        &self.state
    }

    /// Musical position from the last processed segment.
    pub fn musical_position(&self) -> Option<MusicalPosition> {
        self.musical_position
    }

    /// The MIDI output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// The MIDI output, mutably.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    // =========================================================================
    // Emission
    // =========================================================================

    fn send_note(&mut self, time: SampleTime, note: u8, on: bool) {
        let protocol = self.config.midi_protocol;
        let packet = match protocol {
            MidiProtocol::Midi2 => {
                let words = if on {
                    midi2_note_on(0, 0, note, 0, 0, MAX_VELOCITY)
                } else {
                    midi2_note_off(0, 0, note, 0, 0, 0)
                };
                MidiEventPacket::new(0, &words)
            }
            MidiProtocol::Midi1 => {
                let word = if on {
                    midi1_channel_voice(0, status::NOTE_ON << 4, note, MIDI1_MAX_VELOCITY)
                } else {
                    midi1_channel_voice(0, status::NOTE_OFF << 4, note, 0)
                };
                MidiEventPacket::new(0, &[word])
            }
        };
        let list = MidiEventList::new(protocol, slice::from_ref(&packet));
        self.output.emit(time, 0, &list);
    }

    fn forward_midi1(&mut self, now: SampleTime, message: &MidiMessage) {
        let Some(word) = midi1_to_ump(message) else {
            return;
        };
        let packet = MidiEventPacket::new(0, &[word]);
        let list = MidiEventList::new(MidiProtocol::Midi1, slice::from_ref(&packet));
        self.output.emit(now, message.cable, &list);
    }
}

impl<O: MidiOutput, C: MusicalContext> MidiKernel for NoteGateKernel<O, C> {
    fn process(&mut self, segment_start: SampleTime, _frame_count: FrameCount) {
        if self.bypassed {
            return;
        }

        self.musical_position = self.context.query();

        match self.state.evaluate() {
            NoteTransition::None => {}
            NoteTransition::On(note) => self.send_note(segment_start, note, true),
            NoteTransition::Retrigger { off, on } => {
                self.send_note(segment_start, off, false);
                self.send_note(segment_start, on, true);
            }
            NoteTransition::Off(note) => self.send_note(segment_start, note, false),
        }
    }

    fn handle_one_event(&mut self, now: SampleTime, event: &RenderEvent<'_>) {
        match event.kind {
            RenderEventKind::Parameter(p) => self.set_parameter(p.address, p.value),
            // Both parameters are discrete, a ramp lands on its end value
            RenderEventKind::ParameterRamp(r) => self.set_parameter(r.address, r.end_value),
            RenderEventKind::Midi(message) => self.forward_midi1(now, &message),
            RenderEventKind::MidiEventList(e) => self.output.emit(now, e.cable, &e.list),
        }
    }
}
