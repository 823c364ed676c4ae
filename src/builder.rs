//! Builder for configuring and constructing a `ChordKeyEngine`.

use crate::core::{ChordController, ControllerConfig, KeyMap};
use crate::midi::midi_output_channel_with_capacity;
use crate::{ChordKeyEngine, Result};
use tracing::info;

/// Default capacity of the channel carrying emitted MIDI out of the period.
const DEFAULT_MIDI_CAPACITY: usize = 1024;

/// Backends are opt-in Cargo features. Without `audio` the host drives the
/// emitter itself through [`ChordKeyEngine::process_period`]; without
/// `midi-hardware` it drains emitted events from
/// [`ChordKeyEngine::midi_output`].
///
/// # Example
///
/// ```ignore
/// use chordkey::prelude::*;
///
/// let mut engine = ChordKeyEngine::builder()
///     .base_note(48)
///     .volume(100)
///     .build()?;
///
/// engine.start();
/// ```
pub struct ChordKeyEngineBuilder {
    config: ControllerConfig,
    midi_capacity: usize,
    output_device: Option<usize>,
    midi_output: Option<String>,
}

impl Default for ChordKeyEngineBuilder {
    fn default() -> Self {
        Self {
            config: ControllerConfig::default(),
            midi_capacity: DEFAULT_MIDI_CAPACITY,
            output_device: None,
            midi_output: None,
        }
    }
}

impl ChordKeyEngineBuilder {
    /// Replace the whole controller configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn keymap(mut self, keymap: KeyMap) -> Self {
        self.config.keymap = keymap;
        self
    }

    /// Default: 127
    pub fn volume(mut self, volume: u8) -> Self {
        self.config.volume = volume;
        self
    }

    /// Default: 60 (middle C)
    pub fn base_note(mut self, base_note: i32) -> Self {
        self.config.base_note = base_note;
        self
    }

    /// Default: 0
    pub fn channel(mut self, channel: u8) -> Self {
        self.config.channel = channel;
        self
    }

    /// Fixed Note-Off velocity. By default Note-Offs use the current volume.
    pub fn release_velocity(mut self, velocity: u8) -> Self {
        self.config.release_velocity = Some(velocity);
        self
    }

    /// Default: 256
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Default: 1024
    pub fn midi_capacity(mut self, capacity: usize) -> Self {
        self.midi_capacity = capacity.max(1);
        self
    }

    /// Audio output device index. Only used with the `audio` feature.
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    /// MIDI output port to connect on build, matched by name. Only used with
    /// the `midi-hardware` feature.
    pub fn midi_output(mut self, name: impl Into<String>) -> Self {
        self.midi_output = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ChordKeyEngine> {
        let channel = self.config.channel;
        let (controller, emitter) = ChordController::with_emitter(self.config)?;
        let (producer, consumer) = midi_output_channel_with_capacity(self.midi_capacity);

        info!(
            "chordkey engine ready: base note {}, volume {}, channel {}",
            controller.base_note(),
            controller.volume(),
            channel
        );

        let mut engine = ChordKeyEngine::from_parts(
            controller,
            emitter,
            producer,
            consumer,
            self.output_device,
        );

        if let Some(name) = self.midi_output {
            engine.open_midi_output(&name);
        }

        Ok(engine)
    }
}
