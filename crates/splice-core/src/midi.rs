//! Universal MIDI Packet (UMP) types and helpers.
//!
//! Kernels exchange MIDI with the host as lists of UMP packets. A packet is a
//! timestamp plus up to [`MAX_PACKET_WORDS`] 32-bit words; a list is a
//! borrowed run of packets tagged with the protocol they were written in.
//!
//! # UMP Layout
//!
//! Every UMP message starts with a 4-bit message type (MT) and a 4-bit group:
//!
//! - MT 2: MIDI 1.0 channel voice, one word
//!   `[MT=2][group][status|channel][data1][data2]`
//! - MT 4: MIDI 2.0 channel voice, two words
//!   `[MT=4][group][status|channel][note][attribute type]`
//!   `[velocity (16 bit)][attribute data (16 bit)]`
//!
//! # Emitting MIDI
//!
//! Kernels never talk to the host directly. They are handed a [`MidiOutput`]
//! at construction and call [`MidiOutput::emit()`] with an absolute sample
//! time. Any `FnMut(SampleTime, u8, &MidiEventList)` closure is a
//! `MidiOutput`.
//!
//! ```ignore
//! let words = midi2_note_on(0, 0, 60, 0, 0, MAX_VELOCITY);
//! let packet = MidiEventPacket::new(0, &words);
//! let list = MidiEventList::new(MidiProtocol::Midi2, std::slice::from_ref(&packet));
//! output.emit(now, 0, &list);
//! ```

use std::fmt;

use crate::event::MidiMessage;
use crate::types::SampleTime;

// =============================================================================
// Constants
// =============================================================================

/// Maximum number of 32-bit words in one packet.
pub const MAX_PACKET_WORDS: usize = 64;

/// Full-scale MIDI 2.0 note velocity (16 bit).
pub const MAX_VELOCITY: u16 = 0xFFFF;

/// MIDI 1.0 status nibbles used by the note helpers.
pub mod status {
    /// Note Off.
    pub const NOTE_OFF: u8 = 0x8;
    /// Note On.
    pub const NOTE_ON: u8 = 0x9;
}

const MT_MIDI1_CHANNEL_VOICE: u32 = 0x2;
const MT_MIDI2_CHANNEL_VOICE: u32 = 0x4;

// =============================================================================
// Protocol
// =============================================================================

/// MIDI protocol a kernel speaks.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MidiProtocol {
    /// MIDI 1.0 messages in UMP (message type 2).
    Midi1 = 1,
    /// MIDI 2.0 messages in UMP (message type 4).
    #[default]
    Midi2 = 2,
}

// =============================================================================
// Packets and Lists
// =============================================================================

/// One timestamped UMP packet.
#[derive(Clone, Copy)]
pub struct MidiEventPacket {
    /// Host timestamp for the packet. Zero means "now".
    pub time_stamp: u64,
    word_count: usize,
    words: [u32; MAX_PACKET_WORDS],
}

impl MidiEventPacket {
    /// Build a packet from message words.
    ///
    /// Words past [`MAX_PACKET_WORDS`] are dropped.
    pub fn new(time_stamp: u64, words: &[u32]) -> Self {
        let word_count = words.len().min(MAX_PACKET_WORDS);
        let mut storage = [0u32; MAX_PACKET_WORDS];
        storage[..word_count].copy_from_slice(&words[..word_count]);
        Self {
            time_stamp,
            word_count,
            words: storage,
        }
    }

    /// The packet's message words.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words[..self.word_count]
    }

    /// Number of valid words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

impl fmt::Debug for MidiEventPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiEventPacket")
            .field("time_stamp", &self.time_stamp)
            .field("words", &self.words())
            .finish()
    }
}

impl PartialEq for MidiEventPacket {
    fn eq(&self, other: &Self) -> bool {
        self.time_stamp == other.time_stamp && self.words() == other.words()
    }
}

/// Borrowed list of UMP packets in one protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEventList<'a> {
    /// Protocol the packets are written in.
    pub protocol: MidiProtocol,
    /// The packets, in order.
    pub packets: &'a [MidiEventPacket],
}

impl<'a> MidiEventList<'a> {
    /// Wrap a run of packets.
    pub const fn new(protocol: MidiProtocol, packets: &'a [MidiEventPacket]) -> Self {
        Self { protocol, packets }
    }

    /// Number of packets.
    #[inline]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Returns true if the list holds no packets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Iterate over the packets.
    pub fn iter(&self) -> std::slice::Iter<'a, MidiEventPacket> {
        self.packets.iter()
    }
}

// =============================================================================
// Output
// =============================================================================

/// Destination for MIDI a kernel emits.
///
/// Called on the render thread; implementations must not block or allocate.
/// Within one render call `sample_time` never decreases.
pub trait MidiOutput {
    /// Deliver one event list at an absolute sample time on a cable.
    fn emit(&mut self, sample_time: SampleTime, cable: u8, list: &MidiEventList<'_>);
}

impl<F> MidiOutput for F
where
    F: FnMut(SampleTime, u8, &MidiEventList<'_>),
{
    #[inline]
    fn emit(&mut self, sample_time: SampleTime, cable: u8, list: &MidiEventList<'_>) {
        self(sample_time, cable, list)
    }
}

// =============================================================================
// Message Construction
// =============================================================================

#[inline]
fn midi2_channel_voice(
    group: u8,
    status: u8,
    channel: u8,
    note: u8,
    attribute_type: u8,
    velocity: u16,
    attribute_data: u16,
) -> [u32; 2] {
    let word0 = (MT_MIDI2_CHANNEL_VOICE << 28)
        | (u32::from(group & 0x0F) << 24)
        | (u32::from(status & 0x0F) << 20)
        | (u32::from(channel & 0x0F) << 16)
        | (u32::from(note & 0x7F) << 8)
        | u32::from(attribute_type);
    let word1 = (u32::from(velocity) << 16) | u32::from(attribute_data);
    [word0, word1]
}

/// Build a MIDI 2.0 Note On message (two words).
pub fn midi2_note_on(
    group: u8,
    channel: u8,
    note: u8,
    attribute_type: u8,
    attribute_data: u16,
    velocity: u16,
) -> [u32; 2] {
    midi2_channel_voice(
        group,
        status::NOTE_ON,
        channel,
        note,
        attribute_type,
        velocity,
        attribute_data,
    )
}

/// Build a MIDI 2.0 Note Off message (two words).
pub fn midi2_note_off(
    group: u8,
    channel: u8,
    note: u8,
    attribute_type: u8,
    attribute_data: u16,
    velocity: u16,
) -> [u32; 2] {
    midi2_channel_voice(
        group,
        status::NOTE_OFF,
        channel,
        note,
        attribute_type,
        velocity,
        attribute_data,
    )
}

/// Build a MIDI 1.0 channel voice message in UMP form (one word).
///
/// `status` is the full status byte (e.g. `0x90 | channel`).
pub fn midi1_channel_voice(group: u8, status: u8, data1: u8, data2: u8) -> u32 {
    (MT_MIDI1_CHANNEL_VOICE << 28)
        | (u32::from(group & 0x0F) << 24)
        | (u32::from(status) << 16)
        | (u32::from(data1 & 0x7F) << 8)
        | u32::from(data2 & 0x7F)
}

/// Convert a raw MIDI 1.0 byte message to a UMP word.
///
/// Returns `None` for anything that is not a channel voice message.
pub fn midi1_to_ump(message: &MidiMessage) -> Option<u32> {
    let bytes = message.bytes();
    let status = *bytes.first()?;
    if !(0x80..0xF0).contains(&status) {
        return None;
    }
    let data1 = bytes.get(1).copied().unwrap_or(0);
    let data2 = bytes.get(2).copied().unwrap_or(0);
    Some(midi1_channel_voice(message.cable, status, data1, data2))
}

// =============================================================================
// Decoding
// =============================================================================

/// A decoded note message, from either protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMessage {
    /// True for Note On, false for Note Off.
    pub on: bool,
    pub group: u8,
    pub channel: u8,
    pub note: u8,
    /// Velocity scaled to 16 bits (MIDI 1.0 values are shifted up).
    pub velocity: u16,
}

/// Decode the note message at the start of a packet's words.
///
/// Understands MIDI 1.0 (MT 2) and MIDI 2.0 (MT 4) Note On/Off. Anything
/// else returns `None`.
pub fn decode_note(words: &[u32]) -> Option<NoteMessage> {
    let word0 = *words.first()?;
    let message_type = word0 >> 28;
    let group = ((word0 >> 24) & 0x0F) as u8;
    let status = ((word0 >> 20) & 0x0F) as u8;
    let channel = ((word0 >> 16) & 0x0F) as u8;
    let note = ((word0 >> 8) & 0x7F) as u8;

    let on = match status {
        status::NOTE_ON => true,
        status::NOTE_OFF => false,
        _ => return None,
    };

    let velocity = match message_type {
        MT_MIDI1_CHANNEL_VOICE => ((word0 & 0x7F) as u16) << 9,
        MT_MIDI2_CHANNEL_VOICE => (*words.get(1)? >> 16) as u16,
        _ => return None,
    };

    Some(NoteMessage {
        on,
        group,
        channel,
        note,
        velocity,
    })
}
