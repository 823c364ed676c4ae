//! Hardware MIDI output (feature `midi-io`).

mod output;

pub use output::{MidiOutputDevice, MidiOutputManager};
