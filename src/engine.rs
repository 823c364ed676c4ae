//! ChordKeyEngine that wires the controller to its audio and MIDI backends.

use crate::core::{
    Action, AudioCallbackState, ChordController, InputEvent, MidiEmitter, SharedKeyState,
};
use crate::midi::{MidiOutputConsumer, MidiOutputProducer};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[cfg(feature = "audio")]
use crate::core::{AudioEngine, AudioEngineConfig};

#[cfg(feature = "midi-hardware")]
use crate::midi::{MidiOutputDevice, MidiOutputManager};

/// Diagnostic counters maintained by the emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub periods: u64,
    pub dropped_notes: u64,
    pub dropped_events: u64,
}

/// Chord controller plus the backends that carry its MIDI out.
///
/// Owns the event-context [`ChordController`]. The [`MidiEmitter`] lives
/// here until [`start`](Self::start) moves it into an audio stream, or until
/// the host takes it with [`take_emitter`](Self::take_emitter). While the
/// engine still holds it, [`process_period`](Self::process_period) runs it
/// by hand.
///
/// # Example
///
/// ```ignore
/// use chordkey::prelude::*;
///
/// let mut engine = ChordKeyEngine::builder().build()?;
/// engine.handle_input_event(InputEvent::KeyPressed { keyval: 49, keycode: 10 });
/// engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode: 52 });
///
/// engine.process_period(256);
/// let events = engine.midi_output().map(|out| out.drain_all());
/// ```
pub struct ChordKeyEngine {
    controller: ChordController,
    emitter: Option<MidiEmitter>,
    producer: Option<MidiOutputProducer>,
    /// Emitted events, when no hardware forwarder has claimed them.
    consumer: Option<MidiOutputConsumer>,
    shared: Arc<SharedKeyState>,
    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    output_device: Option<usize>,
    backend_warned: bool,

    #[cfg(feature = "audio")]
    audio: Option<AudioEngine>,

    #[cfg(feature = "midi-hardware")]
    midi_out: Option<MidiOutputManager>,
}

impl ChordKeyEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::ChordKeyEngineBuilder {
        crate::ChordKeyEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        controller: ChordController,
        emitter: MidiEmitter,
        producer: MidiOutputProducer,
        consumer: MidiOutputConsumer,
        output_device: Option<usize>,
    ) -> Self {
        let shared = Arc::clone(controller.shared());
        Self {
            controller,
            emitter: Some(emitter),
            producer: Some(producer),
            consumer: Some(consumer),
            shared,
            output_device,
            backend_warned: false,
            #[cfg(feature = "audio")]
            audio: None,
            #[cfg(feature = "midi-hardware")]
            midi_out: None,
        }
    }

    /// Feed one raw input to the controller.
    pub fn handle_input_event(&mut self, event: InputEvent) -> Action {
        self.controller.handle_input_event(event)
    }

    pub fn controller(&self) -> &ChordController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ChordController {
        &mut self.controller
    }

    /// Start the audio backend so the emitter runs once per period.
    ///
    /// Returns whether audio is running. When the backend is missing or
    /// fails to start the engine warns once and keeps working: the emitter
    /// stays with the engine and [`process_period`](Self::process_period)
    /// still drives it.
    pub fn start(&mut self) -> bool {
        if self.is_audio_running() {
            return true;
        }
        match self.start_audio() {
            Ok(()) => true,
            Err(e) => {
                self.warn_backend_unavailable(&e);
                false
            }
        }
    }

    #[cfg(feature = "audio")]
    fn start_audio(&mut self) -> crate::Result<()> {
        if self.emitter.is_none() || self.producer.is_none() {
            return Err(Self::emitter_taken());
        }
        let mut audio = AudioEngine::new(AudioEngineConfig {
            output_device_index: self.output_device,
        })?;
        let state = self.take_callback_state().ok_or_else(Self::emitter_taken)?;
        if let Err(e) = audio.start(state) {
            if let Some(state) = audio.reclaim() {
                self.restore_callback_state(state);
            }
            return Err(e.into());
        }
        tracing::info!(
            "Audio running at {} Hz, {} channels",
            audio.sample_rate(),
            audio.channels()
        );
        self.audio = Some(audio);
        Ok(())
    }

    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    fn emitter_taken() -> crate::Error {
        chordkey_core::Error::AudioBackendUnavailable("emitter was taken by the host".to_string())
            .into()
    }

    /// Move the emitter and MIDI producer out, both or neither.
    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    fn take_callback_state(&mut self) -> Option<AudioCallbackState> {
        if self.emitter.is_none() || self.producer.is_none() {
            return None;
        }
        Some(AudioCallbackState::new(
            self.emitter.take()?,
            self.producer.take()?,
        ))
    }

    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    fn restore_callback_state(&mut self, state: AudioCallbackState) {
        let (emitter, producer) = state.into_parts();
        self.emitter = Some(emitter);
        self.producer = Some(producer);
    }

    #[cfg(not(feature = "audio"))]
    fn start_audio(&mut self) -> crate::Result<()> {
        Err(chordkey_core::Error::AudioBackendUnavailable(
            "built without the `audio` feature".to_string(),
        )
        .into())
    }

    fn warn_backend_unavailable(&mut self, error: &crate::Error) {
        if !self.backend_warned {
            warn!("Audio backend unavailable, MIDI will not be emitted: {}", error);
            self.backend_warned = true;
        }
    }

    /// Stop the audio stream. The emitter comes back to the engine, so
    /// [`process_period`](Self::process_period) or a later
    /// [`start`](Self::start) can drive it again.
    #[cfg(feature = "audio")]
    pub fn stop(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.stop();
            if let Some(state) = audio.reclaim() {
                self.restore_callback_state(state);
            }
        }
    }

    pub fn is_audio_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Run one emitter period by hand into the MIDI output channel.
    ///
    /// Returns the number of events written, or 0 when the emitter is owned
    /// by the audio stream or the host.
    pub fn process_period(&mut self, frames: usize) -> usize {
        match (&mut self.emitter, &mut self.producer) {
            (Some(emitter), Some(producer)) => emitter.process(frames, producer),
            _ => 0,
        }
    }

    /// Hand the emitter to the host, which then calls
    /// [`MidiEmitter::process`] from its own audio callback.
    pub fn take_emitter(&mut self) -> Option<MidiEmitter> {
        self.producer = None;
        self.emitter.take()
    }

    /// Emitted MIDI, when no hardware output is forwarding it.
    pub fn midi_output(&mut self) -> Option<&mut MidiOutputConsumer> {
        self.consumer.as_mut()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            periods: self.shared.periods.get(),
            dropped_notes: self.shared.dropped_notes.get(),
            dropped_events: self.shared.dropped_events.get(),
        }
    }

    /// Available hardware MIDI outputs.
    #[cfg(feature = "midi-hardware")]
    pub fn list_midi_outputs() -> Vec<MidiOutputDevice> {
        MidiOutputManager::list_devices()
    }

    /// Forward emitted MIDI to the output port called `name`.
    ///
    /// The first call hands the output channel to a forwarding thread, after
    /// which [`midi_output`](Self::midi_output) returns `None`.
    #[cfg(feature = "midi-hardware")]
    pub fn connect_midi_output(&mut self, name: &str) -> crate::Result<()> {
        if self.midi_out.is_none() {
            let Some(consumer) = self.consumer.take() else {
                return Err(chordkey_midi::Error::InvalidConfig(
                    "MIDI output channel already claimed".to_string(),
                )
                .into());
            };
            self.midi_out = Some(MidiOutputManager::spawn(consumer)?);
        }
        match &self.midi_out {
            Some(manager) => Ok(manager.connect_by_name(name)?),
            None => Ok(()),
        }
    }

    #[cfg(feature = "midi-hardware")]
    pub fn is_midi_connected(&self) -> bool {
        self.midi_out
            .as_ref()
            .is_some_and(|manager| manager.is_connected())
    }

    /// Best-effort connect used by the builder; failures are reported once.
    pub(crate) fn open_midi_output(&mut self, name: &str) {
        #[cfg(feature = "midi-hardware")]
        if let Err(e) = self.connect_midi_output(name) {
            warn!("MIDI output '{}' unavailable: {}", name, e);
        }
        #[cfg(not(feature = "midi-hardware"))]
        warn!(
            "MIDI output '{}' requested but built without the `midi-hardware` feature",
            name
        );
    }
}
