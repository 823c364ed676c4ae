//! Per-period work done on the audio thread.

use crate::emitter::MidiEmitter;
use crate::transition::SharedKeyState;
use chordkey_midi::{MidiOutputProducer, MidiSink};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;

/// Everything the audio callback owns: the emitter and the producer side of
/// the MIDI output channel. Moved into the stream closure on start.
pub struct AudioCallbackState<S = MidiOutputProducer> {
    emitter: MidiEmitter,
    sink: S,
}

impl<S: MidiSink> AudioCallbackState<S> {
    pub fn new(emitter: MidiEmitter, sink: S) -> Self {
        Self { emitter, sink }
    }

    pub fn shared(&self) -> &Arc<SharedKeyState> {
        self.emitter.shared()
    }

    /// Emit this period's MIDI. Returns the number of events written.
    #[inline]
    pub fn process_period(&mut self, frames: usize) -> usize {
        self.emitter.process(frames, &mut self.sink)
    }

    pub fn into_parts(self) -> (MidiEmitter, S) {
        (self.emitter, self.sink)
    }
}

/// Callback state owned by a stream closure that sends it back when the
/// closure is dropped: after a failed build or play, and after stop.
pub struct ReturningState<S = MidiOutputProducer> {
    state: Option<AudioCallbackState<S>>,
    home: Sender<AudioCallbackState<S>>,
}

impl<S> ReturningState<S> {
    pub fn new(state: AudioCallbackState<S>, home: Sender<AudioCallbackState<S>>) -> Self {
        Self {
            state: Some(state),
            home,
        }
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut AudioCallbackState<S>> {
        self.state.as_mut()
    }
}

impl<S> Drop for ReturningState<S> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            let _ = self.home.try_send(state);
        }
    }
}

/// Channel a [`ReturningState`] sends its state home on.
pub fn return_channel<S>() -> (Sender<AudioCallbackState<S>>, Receiver<AudioCallbackState<S>>) {
    bounded(1)
}

/// Fill an interleaved output buffer with silence and run one period.
///
/// The stream only provides the period clock; the controller produces no
/// audio of its own.
pub fn process_audio<S: MidiSink, T: Copy>(
    state: &mut AudioCallbackState<S>,
    data: &mut [T],
    channels: usize,
    silence: T,
) -> usize {
    data.fill(silence);
    let frames = data.len() / channels.max(1);
    state.process_period(frames)
}
