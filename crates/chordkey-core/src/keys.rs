//! Physical keys and the per-key state table.

use crate::chord::{ChordDefinition, SlotId};
use crate::error::{Error, Rejection, Result};
use crate::transition::{KeyTransition, SharedKeyState, TransitionProducer};
use core::fmt;
use std::sync::Arc;
use tracing::debug;

/// Number of modeled keys.
pub const NUM_KEYS: usize = 17;

type Outcome<T> = core::result::Result<T, Rejection>;

/// Key color on the on-screen keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

// Seventeen keys starting on E.
const KEY_COLORS: [KeyColor; NUM_KEYS] = {
    use KeyColor::{Black as B, White as W};
    [W, B, W, B, W, W, B, W, B, W, B, W, W, B, W, B, W]
};

/// Index of a physical key (0..17). Also the semitone distance from the
/// base note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyIndex(u8);

impl KeyIndex {
    pub fn new(index: usize) -> Result<Self> {
        if index < NUM_KEYS {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidKey(index))
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn color(self) -> KeyColor {
        KEY_COLORS[self.index()]
    }

    pub fn all() -> impl Iterator<Item = KeyIndex> {
        (0..NUM_KEYS as u8).map(KeyIndex)
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event-side record for one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyState {
    /// Slot current when the key was last pressed or refreshed.
    pub assigned_slot: SlotId,
    pub pressed: bool,
    /// A Note-On went out for the current press and its Note-Off has not
    /// been queued yet.
    pub sounding: bool,
    /// Selection changed while the key was held or its release unsent.
    pub deferred_refresh: bool,
    /// Private copy of the chord this key plays.
    pub materialized: ChordDefinition,
    /// Base note captured with the snapshot.
    pub base_note: i32,
}

impl KeyState {
    fn new(slot: SlotId, chord: ChordDefinition, base_note: i32) -> Self {
        Self {
            assigned_slot: slot,
            pressed: false,
            sounding: false,
            deferred_refresh: false,
            materialized: chord,
            base_note,
        }
    }

    fn refresh(&mut self, slot: SlotId, chord: ChordDefinition) {
        self.assigned_slot = slot;
        self.materialized = chord;
        self.deferred_refresh = false;
    }
}

/// Key records plus the producing end of the transition ring.
///
/// Owned by the event context. Snapshots only change here, and a pressed
/// key's snapshot is never touched until it has been released and the
/// emitter has consumed the release.
pub struct KeyStateTable {
    keys: [KeyState; NUM_KEYS],
    producer: TransitionProducer,
    shared: Arc<SharedKeyState>,
}

impl KeyStateTable {
    pub fn new(
        slot: SlotId,
        chord: ChordDefinition,
        base_note: i32,
        producer: TransitionProducer,
        shared: Arc<SharedKeyState>,
    ) -> Self {
        Self {
            keys: [KeyState::new(slot, chord, base_note); NUM_KEYS],
            producer,
            shared,
        }
    }

    #[inline]
    pub fn state(&self, key: KeyIndex) -> &KeyState {
        &self.keys[key.index()]
    }

    #[inline]
    pub fn is_pressed(&self, key: KeyIndex) -> bool {
        self.keys[key.index()].pressed
    }

    #[inline]
    pub fn is_dirty(&self, key: KeyIndex) -> bool {
        self.shared.is_dirty(key)
    }

    pub fn shared(&self) -> &Arc<SharedKeyState> {
        &self.shared
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyIndex> + '_ {
        KeyIndex::all().filter(|key| self.is_pressed(*key))
    }

    /// Performance press: snapshot `chord` and queue a Note-On.
    ///
    /// Returns whether the transition was queued. When the ring is full the
    /// key still counts as pressed but stays silent, so no Note-Off follows.
    pub fn press(
        &mut self,
        key: KeyIndex,
        slot: SlotId,
        chord: ChordDefinition,
        base_note: i32,
    ) -> Outcome<bool> {
        let state = &mut self.keys[key.index()];
        if state.pressed {
            return Err(Rejection::KeyAlreadyHeld(key));
        }
        state.pressed = true;
        state.refresh(slot, chord);
        state.base_note = base_note;

        let transition = KeyTransition {
            key,
            pressed: true,
            chord,
            base_note,
        };
        let queued = enqueue(&mut self.producer, &self.shared, transition);
        self.keys[key.index()].sounding = queued;
        Ok(queued)
    }

    /// Recording press: marks the key held for feedback, no MIDI.
    pub fn record_press(&mut self, key: KeyIndex) -> Outcome<()> {
        let state = &mut self.keys[key.index()];
        if state.pressed {
            return Err(Rejection::KeyAlreadyHeld(key));
        }
        state.pressed = true;
        Ok(())
    }

    /// Release a held key. A sounding key queues its Note-Off with the
    /// press-time snapshot; returns whether one was queued.
    pub fn release(&mut self, key: KeyIndex) -> Outcome<bool> {
        let state = &mut self.keys[key.index()];
        if !state.pressed {
            return Err(Rejection::KeyNotHeld(key));
        }
        state.pressed = false;
        if !state.sounding {
            return Ok(false);
        }
        state.sounding = false;
        let transition = KeyTransition {
            key,
            pressed: false,
            chord: state.materialized,
            base_note: state.base_note,
        };
        Ok(enqueue(&mut self.producer, &self.shared, transition))
    }

    /// Propagate a new current chord. Idle keys take it now; held keys, and
    /// released keys whose Note-Off is still queued, defer it.
    pub fn selection_changed(&mut self, slot: SlotId, chord: ChordDefinition) {
        for key in KeyIndex::all() {
            let dirty = self.shared.is_dirty(key);
            let state = &mut self.keys[key.index()];
            if state.pressed || dirty {
                state.deferred_refresh = true;
            } else {
                state.refresh(slot, chord);
            }
        }
    }

    /// Apply deferred refreshes for released keys the emitter has caught up
    /// with. Returns how many keys were refreshed.
    pub fn reconcile(&mut self, slot: SlotId, chord: ChordDefinition) -> usize {
        let mut refreshed = 0;
        for key in KeyIndex::all() {
            let dirty = self.shared.is_dirty(key);
            let state = &mut self.keys[key.index()];
            if state.deferred_refresh && !state.pressed && !dirty {
                state.refresh(slot, chord);
                refreshed += 1;
            }
        }
        refreshed
    }
}

fn enqueue(
    producer: &mut TransitionProducer,
    shared: &SharedKeyState,
    transition: KeyTransition,
) -> bool {
    shared.mark_pending(transition.key);
    match producer.push(transition) {
        Ok(()) => true,
        Err(rejected) => {
            shared.complete(rejected.key);
            debug!(
                "Transition queue full, dropping {} of key {}",
                if rejected.pressed { "press" } else { "release" },
                rejected.key
            );
            false
        }
    }
}
