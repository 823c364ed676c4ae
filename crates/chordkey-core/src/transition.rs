//! Hand-off between the event context and the audio period.
//!
//! Every press or release of a sounding key becomes one immutable
//! [`KeyTransition`] pushed onto a lock-free SPSC ring. Alongside the ring,
//! [`SharedKeyState`] holds the per-key dirty markers, the volume and the
//! emitter's diagnostic counters. Nothing here blocks or allocates after
//! construction.

use crate::chord::ChordDefinition;
use crate::keys::{KeyIndex, NUM_KEYS};
use crate::lockfree::{AtomicCounter, AtomicFlag};
use chordkey_midi::clamp_velocity;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Default capacity of the transition ring.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// One press or release, with the snapshot the emitter needs to sound it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyTransition {
    pub key: KeyIndex,
    pub pressed: bool,
    pub chord: ChordDefinition,
    pub base_note: i32,
}

/// Event-context end of the transition ring.
pub struct TransitionProducer {
    producer: HeapProd<KeyTransition>,
}

impl TransitionProducer {
    /// Hands the transition back when the ring is full.
    #[inline]
    pub fn push(&mut self, transition: KeyTransition) -> Result<(), KeyTransition> {
        self.producer.try_push(transition)
    }

    #[inline]
    pub fn vacant_len(&self) -> usize {
        self.producer.vacant_len()
    }
}

/// Audio-period end of the transition ring.
pub struct TransitionConsumer {
    consumer: HeapCons<KeyTransition>,
}

impl TransitionConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<KeyTransition> {
        self.consumer.try_pop()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.consumer.capacity().get()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}

pub fn transition_channel(capacity: usize) -> (TransitionProducer, TransitionConsumer) {
    let rb = HeapRb::new(capacity.max(1));
    let (producer, consumer) = rb.split();
    (
        TransitionProducer { producer },
        TransitionConsumer { consumer },
    )
}

/// State read and written by both contexts.
///
/// A key is dirty while it has transitions the emitter has not yet sounded.
/// The event context raises the count before pushing a transition and the
/// emitter lowers it once after emitting that transition's events.
#[derive(Debug)]
pub struct SharedKeyState {
    pending: [AtomicU32; NUM_KEYS],
    volume: AtomicU8,
    /// Notes whose number fell outside 0..=127.
    pub dropped_notes: AtomicCounter,
    /// Events the sink refused because it was full.
    pub dropped_events: AtomicCounter,
    /// Audio periods processed.
    pub periods: AtomicCounter,
    /// Set while an audio backend is driving the emitter.
    pub running: AtomicFlag,
}

impl SharedKeyState {
    pub fn new(volume: u8) -> Self {
        Self {
            pending: core::array::from_fn(|_| AtomicU32::new(0)),
            volume: AtomicU8::new(volume.min(127)),
            dropped_notes: AtomicCounter::new(),
            dropped_events: AtomicCounter::new(),
            periods: AtomicCounter::new(),
            running: AtomicFlag::new(false),
        }
    }

    #[inline]
    pub fn is_dirty(&self, key: KeyIndex) -> bool {
        self.pending[key.index()].load(Ordering::Acquire) > 0
    }

    /// Transitions queued for `key` and not yet emitted.
    #[inline]
    pub fn pending(&self, key: KeyIndex) -> u32 {
        self.pending[key.index()].load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn mark_pending(&self, key: KeyIndex) {
        self.pending[key.index()].fetch_add(1, Ordering::Release);
    }

    /// Lower the count by one, never below zero.
    #[inline]
    pub(crate) fn complete(&self, key: KeyIndex) {
        let _ = self.pending[key.index()].fetch_update(
            Ordering::AcqRel,
            Ordering::Acquire,
            |count| count.checked_sub(1),
        );
    }

    #[inline]
    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    /// Saturates to 0..=127 and returns the stored value.
    #[inline]
    pub fn set_volume(&self, volume: i32) -> u8 {
        let volume = clamp_velocity(volume);
        self.volume.store(volume, Ordering::Relaxed);
        volume
    }
}

impl Default for SharedKeyState {
    fn default() -> Self {
        Self::new(127)
    }
}
