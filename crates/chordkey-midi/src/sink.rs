//! Destination for events produced during one audio period.

use crate::event::MidiEvent;
use crate::output_collector::MidiOutputProducer;

/// Where the emitter writes the events of one period.
///
/// Implementations used from the audio thread must not block or allocate.
pub trait MidiSink {
    /// Returns false when the event could not be stored (sink full).
    fn write(&mut self, event: MidiEvent) -> bool;
}

impl MidiSink for MidiOutputProducer {
    #[inline]
    fn write(&mut self, event: MidiEvent) -> bool {
        self.push(event)
    }
}

/// Growable sink for offline use and tests. Allocates.
impl MidiSink for Vec<MidiEvent> {
    fn write(&mut self, event: MidiEvent) -> bool {
        self.push(event);
        true
    }
}

impl<S: MidiSink + ?Sized> MidiSink for &mut S {
    #[inline]
    fn write(&mut self, event: MidiEvent) -> bool {
        (**self).write(event)
    }
}
