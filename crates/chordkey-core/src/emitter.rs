//! Real-time MIDI emitter.
//!
//! Runs once per audio period. Pops every queued [`KeyTransition`], groups
//! them by key, and writes Note-On/Off events in key-index order, each key's
//! transitions in the order they happened and each chord in definition
//! order. A key with more than [`MAX_PENDING_PER_KEY`] transitions in one
//! period carries the rest over. No locks, no allocation and no logging:
//! problems are counted in [`SharedKeyState`].

use crate::keys::{KeyIndex, NUM_KEYS};
use crate::transition::{KeyTransition, SharedKeyState, TransitionConsumer};
use chordkey_midi::{note_number, MidiEvent, MidiSink};
use std::sync::Arc;

/// Transitions one key can sound in a single period. A key with more waits
/// for the next period without holding back the other keys.
pub const MAX_PENDING_PER_KEY: usize = 4;

/// Frames between the events of successive keys.
const FRAMES_PER_KEY: usize = 3;

/// Per-key transitions selected for the current period.
struct Staged {
    slots: [[Option<KeyTransition>; MAX_PENDING_PER_KEY]; NUM_KEYS],
    len: [usize; NUM_KEYS],
}

impl Staged {
    fn new() -> Self {
        Self {
            slots: [[None; MAX_PENDING_PER_KEY]; NUM_KEYS],
            len: [0; NUM_KEYS],
        }
    }

    /// Returns false when the key already has a full period.
    fn push(&mut self, transition: KeyTransition) -> bool {
        let k = transition.key.index();
        let len = self.len[k];
        if len == MAX_PENDING_PER_KEY {
            return false;
        }
        self.slots[k][len] = Some(transition);
        self.len[k] = len + 1;
        true
    }
}

pub struct MidiEmitter {
    consumer: TransitionConsumer,
    shared: Arc<SharedKeyState>,
    staged: Staged,
    /// Popped transitions whose key was full, oldest first. Sized to the
    /// transition ring up front and never grown.
    backlog: Vec<KeyTransition>,
    channel: u8,
    release_velocity: Option<u8>,
}

impl MidiEmitter {
    pub fn new(
        consumer: TransitionConsumer,
        shared: Arc<SharedKeyState>,
        channel: u8,
        release_velocity: Option<u8>,
    ) -> Self {
        let backlog = Vec::with_capacity(consumer.capacity());
        Self {
            consumer,
            shared,
            staged: Staged::new(),
            backlog,
            channel: channel.min(15),
            release_velocity: release_velocity.map(|v| v.min(127)),
        }
    }

    pub fn shared(&self) -> &Arc<SharedKeyState> {
        &self.shared
    }

    /// True if transitions are waiting for the next period.
    pub fn has_pending(&self) -> bool {
        !self.backlog.is_empty() || !self.consumer.is_empty()
    }

    /// Emit one period's worth of events into `sink`.
    ///
    /// `frames` is the period length; event offsets stay below it. Returns
    /// the number of events the sink accepted.
    pub fn process<S: MidiSink + ?Sized>(&mut self, frames: usize, sink: &mut S) -> usize {
        self.shared.periods.increment();
        self.collect();

        let last_frame = frames.saturating_sub(1);
        let volume = self.shared.volume();
        let release_velocity = self.release_velocity.unwrap_or(volume);
        let mut written = 0;
        let mut emit_index = 0;

        for key in KeyIndex::all() {
            let k = key.index();
            let count = self.staged.len[k];
            if count == 0 {
                continue;
            }
            let frame = (emit_index * FRAMES_PER_KEY).min(last_frame);
            for slot in self.staged.slots[k].iter_mut().take(count) {
                let Some(transition) = slot.take() else {
                    continue;
                };
                for offset in transition.chord.iter() {
                    let Some(note) = note_number(transition.base_note, k, offset) else {
                        self.shared.dropped_notes.increment();
                        continue;
                    };
                    let event = if transition.pressed {
                        MidiEvent::note_on(frame, self.channel, note, volume)
                    } else {
                        MidiEvent::note_off(frame, self.channel, note, release_velocity)
                    };
                    if sink.write(event) {
                        written += 1;
                    } else {
                        self.shared.dropped_events.increment();
                    }
                }
                self.shared.complete(key);
            }
            self.staged.len[k] = 0;
            emit_index += 1;
        }
        written
    }

    /// Stage this period's transitions. Backlogged ones go first so each
    /// key keeps its order; a key that is still full after that keeps
    /// collecting into the backlog while the other keys stage normally.
    fn collect(&mut self) {
        let staged = &mut self.staged;
        self.backlog.retain(|transition| !staged.push(*transition));

        while self.backlog.len() < self.backlog.capacity() {
            let Some(transition) = self.consumer.pop() else {
                break;
            };
            if !self.staged.push(transition) {
                self.backlog.push(transition);
            }
        }
    }
}
