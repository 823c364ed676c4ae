//! # chordkey - Programmable Chord Controller
//!
//! Turns single key presses into chords streamed as MIDI.
//!
//! ## Architecture
//!
//! chordkey is an umbrella crate that coordinates:
//! - **chordkey-core** - Chord store, key state table, chord editor, input
//!   dispatcher and the real-time MIDI emitter
//! - **chordkey-midi** - MIDI event types, the lock-free output channel and
//!   hardware MIDI output
//!
//! The controller runs in the host's event context. The emitter runs once per
//! audio period and only talks to the controller through a lock-free queue of
//! per-key transitions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chordkey::prelude::*;
//!
//! let mut engine = ChordKeyEngine::builder().base_note(60).build()?;
//!
//! // Select the major chord, then press the lowest note key.
//! engine.handle_input_event(InputEvent::KeyPressed { keyval: 49, keycode: 10 });
//! engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode: 52 });
//!
//! // Without an audio backend, run the emitter by hand.
//! engine.process_period(256);
//! for event in engine.midi_output().map(|out| out.drain_all()).unwrap_or_default() {
//!     println!("{:?}", event.to_bytes());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Controller and emitter, no system libraries needed
//! - `audio` - CPAL output stream drives the emitter
//! - `midi-hardware` - Forward emitted MIDI to a hardware port
//! - `hardware` - Both backends

/// Re-export of chordkey-core for direct access
pub use chordkey_core as core;

/// Re-export of chordkey-midi for direct access
pub use chordkey_midi as midi;

// Core types
pub use chordkey_core::{
    Action, CaptureLevel, ChordController, ChordDefinition, ChordEditor, ChordStore,
    ControllerConfig, Direction, EditorState, InputEvent, InputMode, Inversion, KeyColor,
    KeyIndex, KeyMap, KeyState, MidiEmitter, MouseButton, Rejection, SlotId, SlotInfo,
    MAX_CHORD_LEN, NUM_KEYS, NUM_SLOTS,
};

// MIDI types
pub use chordkey_midi::{MidiEvent, MidiOutputConsumer, MidiSink, RawMidiEvent};

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::ChordKeyEngineBuilder;
pub use engine::{ChordKeyEngine, EngineStats};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{ChordKeyEngine, ChordKeyEngineBuilder};

    // Input and results
    pub use crate::core::{Action, InputEvent, MouseButton, Rejection};

    // Chords and keys
    pub use crate::core::{ChordDefinition, Inversion, KeyIndex, SlotId};

    // MIDI
    pub use crate::midi::{MidiEvent, MidiSink};
}
