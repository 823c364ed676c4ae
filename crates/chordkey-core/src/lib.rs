//! Chord engine and real-time MIDI hand-off for the chordkey controller.
//!
//! # Primary API
//!
//! - [`ChordController`]: event-context entry point, one
//!   [`ChordController::handle_input_event`] per raw input
//! - [`MidiEmitter`]: audio-period side, one [`MidiEmitter::process`] per block
//! - [`ChordStore`], [`ChordDefinition`], [`SlotId`]: chord slots and math
//! - [`KeyStateTable`], [`KeyIndex`]: per-key press state and snapshots
//! - [`ChordEditor`]: `Idle` / `Recording` chord capture
//!
//! # Feature-gated APIs
//!
//! - `"audio"`: [`AudioEngine`], a CPAL output stream that runs the emitter
//!   once per period
//!
//! # Example
//!
//! ```ignore
//! use chordkey_core::{ChordController, ControllerConfig, InputEvent};
//!
//! let (mut controller, mut emitter) = ChordController::with_emitter(ControllerConfig::default())?;
//! controller.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode: 52 });
//!
//! let mut events = Vec::new();
//! emitter.process(256, &mut events);
//! ```

pub mod error;
pub use error::{Error, Rejection, Result};

pub mod chord;
pub use chord::{
    invert_down, invert_up, ChordDefinition, ChordSlot, ChordStore, Direction, Inversion,
    SlotId, SlotInfo, BUILTIN_SLOTS, MAX_CHORD_LEN, NUM_SLOTS, OCTAVE,
};

pub mod keys;
pub use keys::{KeyColor, KeyIndex, KeyState, KeyStateTable, NUM_KEYS};

pub mod transition;
pub use transition::{
    transition_channel, KeyTransition, SharedKeyState, TransitionConsumer, TransitionProducer,
    DEFAULT_QUEUE_CAPACITY,
};

mod editor;
pub use editor::{ChordEditor, EditorState};

pub mod keymap;
pub use keymap::{ArrowCodes, InputMode, KeyCommand, KeyMap};

mod config;
pub use config::ControllerConfig;

mod dispatcher;
pub use dispatcher::{Action, CaptureLevel, ChordController, InputEvent, MouseButton};

mod emitter;
pub use emitter::{MidiEmitter, MAX_PENDING_PER_KEY};

mod callback;
pub use callback::{process_audio, return_channel, AudioCallbackState, ReturningState};

pub(crate) mod lockfree;
pub use lockfree::{AtomicCounter, AtomicFlag};

#[cfg(feature = "audio")]
mod output;
#[cfg(feature = "audio")]
pub use output::{AudioEngine, AudioEngineConfig};
