//! Lock-free channel carrying emitted MIDI out of the audio period.
//!
//! The emitter owns the producer and writes into it from the audio thread;
//! the consumer side is drained by the hardware output thread or, without
//! hardware, by the host application.

use crate::event::MidiEvent;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

/// Default capacity for the MIDI output ring buffer
const DEFAULT_CAPACITY: usize = 1024;

/// Producer for pushing MIDI events from the audio thread.
pub struct MidiOutputProducer {
    producer: HeapProd<MidiEvent>,
}

impl MidiOutputProducer {
    /// Returns true if the event was pushed, false if the buffer is full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        self.producer.try_push(event).is_ok()
    }

    /// Free slots left in the buffer.
    #[inline]
    pub fn vacant_len(&self) -> usize {
        self.producer.vacant_len()
    }
}

/// Consumer for draining MIDI events outside the audio thread.
pub struct MidiOutputConsumer {
    consumer: HeapCons<MidiEvent>,
}

impl MidiOutputConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<MidiEvent> {
        self.consumer.try_pop()
    }

    /// Drain all pending events into a vector
    pub fn drain_all(&mut self) -> Vec<MidiEvent> {
        let count = self.consumer.occupied_len();
        let mut events = Vec::with_capacity(count);
        while let Some(event) = self.consumer.try_pop() {
            events.push(event);
        }
        events
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.consumer.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }
}

pub fn midi_output_channel() -> (MidiOutputProducer, MidiOutputConsumer) {
    midi_output_channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn midi_output_channel_with_capacity(
    capacity: usize,
) -> (MidiOutputProducer, MidiOutputConsumer) {
    let rb = HeapRb::new(capacity);
    let (producer, consumer) = rb.split();
    (
        MidiOutputProducer { producer },
        MidiOutputConsumer { consumer },
    )
}
