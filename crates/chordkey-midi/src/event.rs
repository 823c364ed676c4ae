//! RT-safe MIDI note events with sample-accurate timing.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};
use serde::{Deserialize, Serialize};

const NOTE_OFF_STATUS: u8 = 0x80;
const NOTE_ON_STATUS: u8 = 0x90;

/// MIDI channel-voice event with a frame offset inside the current period.
///
/// `Copy` and heap-free so the emitter can produce it on the audio thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Offset within the current buffer (0 = first sample).
    pub frame_offset: usize,
    pub channel: Channel,
    pub msg: ChannelVoiceMsg,
}

impl MidiEvent {
    #[inline]
    pub fn new(frame_offset: usize, channel: Channel, msg: ChannelVoiceMsg) -> Self {
        Self {
            frame_offset,
            channel,
            msg,
        }
    }

    #[inline]
    pub fn note_on(frame_offset: usize, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOn { note, velocity },
        }
    }

    #[inline]
    pub fn note_off(frame_offset: usize, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOff { note, velocity },
        }
    }

    #[inline]
    pub fn channel_num(&self) -> u8 {
        self.channel as u8
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOn { velocity, .. } if velocity > 0)
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self.msg,
            ChannelVoiceMsg::NoteOff { .. } | ChannelVoiceMsg::NoteOn { velocity: 0, .. }
        )
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. } | ChannelVoiceMsg::NoteOff { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { velocity, .. }
            | ChannelVoiceMsg::NoteOff { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    #[inline]
    pub fn to_midi_msg(&self) -> MidiMsg {
        MidiMsg::ChannelVoice {
            channel: self.channel,
            msg: self.msg,
        }
    }

    /// Allocates; use [`RawMidiEvent::from`] on the audio thread.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_midi_msg().to_midi()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, midi_msg::ParseError> {
        Self::from_bytes_with_offset(bytes, 0)
    }

    pub fn from_bytes_with_offset(
        bytes: &[u8],
        frame_offset: usize,
    ) -> Result<Self, midi_msg::ParseError> {
        let (msg, _len) = MidiMsg::from_midi(bytes)?;
        match msg {
            MidiMsg::ChannelVoice { channel, msg } => Ok(Self {
                frame_offset,
                channel,
                msg,
            }),
            _ => Err(midi_msg::ParseError::Invalid(
                "Expected ChannelVoice message",
            )),
        }
    }
}

/// Raw 3-byte MIDI message as written to a port.
///
/// Serializable so hosts can record or replay what was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMidiEvent {
    pub frame_offset: usize,
    pub data: [u8; 3],
    /// Valid bytes in `data` (1-3).
    pub len: u8,
}

impl RawMidiEvent {
    #[inline]
    pub fn new(frame_offset: usize, data: [u8; 3], len: u8) -> Self {
        Self {
            frame_offset,
            data,
            len,
        }
    }

    #[inline]
    pub fn status(&self) -> u8 {
        self.data[0] & 0xF0
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.data[0] & 0x0F
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub fn to_midi_event(&self) -> Result<MidiEvent, midi_msg::ParseError> {
        MidiEvent::from_bytes_with_offset(self.bytes(), self.frame_offset)
    }
}

impl From<MidiEvent> for RawMidiEvent {
    fn from(event: MidiEvent) -> Self {
        let channel = event.channel_num() & 0x0F;
        let (status, note, velocity) = match event.msg {
            ChannelVoiceMsg::NoteOn { note, velocity } => (NOTE_ON_STATUS, note, velocity),
            ChannelVoiceMsg::NoteOff { note, velocity } => (NOTE_OFF_STATUS, note, velocity),
            _ => {
                // Not produced by the emitter; fall back to the generic encoder.
                let bytes = event.to_bytes();
                let mut data = [0u8; 3];
                let len = bytes.len().min(3);
                data[..len].copy_from_slice(&bytes[..len]);
                return Self {
                    frame_offset: event.frame_offset,
                    data,
                    len: len as u8,
                };
            }
        };
        Self {
            frame_offset: event.frame_offset,
            data: [status | channel, note & 0x7F, velocity & 0x7F],
            len: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on() {
        let event = MidiEvent::note_on(3, 0, 60, 127);
        assert!(event.is_note_on());
        assert!(!event.is_note_off());
        assert_eq!(event.note(), Some(60));
        assert_eq!(event.velocity(), Some(127));
        assert_eq!(event.channel_num(), 0);
        assert_eq!(event.frame_offset, 3);
    }

    #[test]
    fn test_note_off() {
        let event = MidiEvent::note_off(0, 2, 64, 40);
        assert!(event.is_note_off());
        assert!(!event.is_note_on());
        assert_eq!(event.note(), Some(64));
        assert_eq!(event.velocity(), Some(40));
        assert_eq!(event.channel_num(), 2);
    }

    #[test]
    fn test_note_on_zero_velocity_is_note_off() {
        let event = MidiEvent::note_on(0, 0, 60, 0);
        assert!(event.is_note_off());
        assert!(!event.is_note_on());
    }

    #[test]
    fn test_raw_note_on_bytes() {
        let raw = RawMidiEvent::from(MidiEvent::note_on(0, 0, 60, 100));
        assert_eq!(raw.bytes(), &[0x90, 60, 100]);
        assert_eq!(raw.status(), 0x90);
        assert_eq!(raw.channel(), 0);
    }

    #[test]
    fn test_raw_note_off_bytes_on_channel() {
        let raw = RawMidiEvent::from(MidiEvent::note_off(12, 9, 67, 0));
        assert_eq!(raw.bytes(), &[0x89, 67, 0]);
        assert_eq!(raw.frame_offset, 12);
    }

    #[test]
    fn test_raw_matches_generic_encoder() {
        let event = MidiEvent::note_on(0, 5, 72, 90);
        let raw = RawMidiEvent::from(event);
        assert_eq!(raw.bytes(), event.to_bytes().as_slice());

        let back = raw.to_midi_event().unwrap();
        assert_eq!(back.msg, event.msg);
        assert_eq!(back.channel, event.channel);
    }
}
