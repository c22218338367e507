//! Scheduled render events.
//!
//! The host hands every render call a time-ordered run of [`RenderEvent`]s.
//! Each event carries an absolute sample time and one of four payloads:
//!
//! | Payload | Effect |
//! |---------|--------|
//! | [`ParameterEvent`] | Set a parameter's value immediately |
//! | [`ParameterRampEvent`] | Ramp a parameter to a new value over a number of frames |
//! | [`MidiMessage`] | A legacy MIDI 1.0 byte message |
//! | [`MidiEventListEvent`] | A list of UMP packets |
//!
//! Timestamps never decrease along the sequence but may lie before the start
//! of the render call. Such late events are delivered before any audio is
//! produced.

use crate::midi::MidiEventList;
use crate::types::{FrameCount, ParameterValue, RawAddress, SampleTime};

// =============================================================================
// Payloads
// =============================================================================

/// Immediate parameter change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterEvent {
    /// Host parameter address.
    pub address: RawAddress,
    /// New value.
    pub value: ParameterValue,
}

/// Linear parameter ramp starting at the event's sample time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRampEvent {
    /// Host parameter address.
    pub address: RawAddress,
    /// Value reached at the end of the ramp.
    pub end_value: ParameterValue,
    /// Ramp length in frames. Zero jumps straight to `end_value`.
    pub duration_frames: FrameCount,
}

/// Legacy MIDI 1.0 message of up to three bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiMessage {
    /// Virtual cable the message arrived on.
    pub cable: u8,
    len: u8,
    data: [u8; 3],
}

impl MidiMessage {
    /// Build a message from its bytes. Bytes past the third are dropped.
    pub fn new(cable: u8, bytes: &[u8]) -> Self {
        let len = bytes.len().min(3);
        let mut data = [0u8; 3];
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            cable,
            len: len as u8,
            data,
        }
    }

    /// The message bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..usize::from(self.len)]
    }
}

/// UMP event list arriving on a cable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEventListEvent<'a> {
    /// Virtual cable.
    pub cable: u8,
    /// The packets.
    pub list: MidiEventList<'a>,
}

// =============================================================================
// Render Event
// =============================================================================

/// Event payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderEventKind<'a> {
    Parameter(ParameterEvent),
    ParameterRamp(ParameterRampEvent),
    Midi(MidiMessage),
    MidiEventList(MidiEventListEvent<'a>),
}

/// One scheduled event.
///
/// `'a` borrows any MIDI packet storage from the host for the render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEvent<'a> {
    /// Absolute sample time the event takes effect at.
    pub sample_time: SampleTime,
    /// What happens.
    pub kind: RenderEventKind<'a>,
}

impl<'a> RenderEvent<'a> {
    /// Immediate parameter change.
    pub const fn parameter(sample_time: SampleTime, address: RawAddress, value: ParameterValue) -> Self {
        Self {
            sample_time,
            kind: RenderEventKind::Parameter(ParameterEvent { address, value }),
        }
    }

    /// Parameter ramp.
    pub const fn parameter_ramp(
        sample_time: SampleTime,
        address: RawAddress,
        end_value: ParameterValue,
        duration_frames: FrameCount,
    ) -> Self {
        Self {
            sample_time,
            kind: RenderEventKind::ParameterRamp(ParameterRampEvent {
                address,
                end_value,
                duration_frames,
            }),
        }
    }

    /// Legacy MIDI 1.0 message.
    pub const fn midi(sample_time: SampleTime, message: MidiMessage) -> Self {
        Self {
            sample_time,
            kind: RenderEventKind::Midi(message),
        }
    }

    /// UMP event list.
    pub const fn midi_event_list(sample_time: SampleTime, cable: u8, list: MidiEventList<'a>) -> Self {
        Self {
            sample_time,
            kind: RenderEventKind::MidiEventList(MidiEventListEvent { cable, list }),
        }
    }
}
