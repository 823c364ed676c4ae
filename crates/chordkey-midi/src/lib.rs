//! MIDI layer for the chordkey chord controller.
//!
//! Provides the RT-safe event types the emitter produces, the [`MidiSink`]
//! trait it writes into, a lock-free output channel between the audio period
//! and whoever forwards events to hardware, and (feature `midi-io`) a `midir`
//! output manager running on its own thread.
//!
//! # Example
//!
//! ```ignore
//! use chordkey_midi::{midi_output_channel, MidiEvent, MidiSink};
//!
//! let (mut producer, mut consumer) = midi_output_channel();
//! producer.write(MidiEvent::note_on(0, 0, 60, 127));
//! assert_eq!(consumer.drain_all().len(), 1);
//! ```

pub mod error;
pub use error::{Error, Result};

pub(crate) mod event;
pub use event::{MidiEvent, RawMidiEvent};

mod sink;
pub use sink::MidiSink;

pub mod output_collector;
pub use output_collector::{
    midi_output_channel, midi_output_channel_with_capacity, MidiOutputConsumer,
    MidiOutputProducer,
};

pub(crate) mod utils;
pub use utils::{clamp_velocity, note_number};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{MidiOutputDevice, MidiOutputManager};

// Upstream message types used in `MidiEvent`
pub use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};
