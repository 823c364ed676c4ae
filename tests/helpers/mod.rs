//! Test helpers and fixtures for chordkey integration tests

use chordkey::prelude::*;

/// Period length used when driving the emitter by hand.
pub const TEST_PERIOD: usize = 256;

/// Hardware code of the `0` digit row key; `1`..`9` follow.
const DIGIT_ZERO_KEYCODE: u32 = 19;

/// Create an engine with the default configuration.
pub fn test_engine() -> ChordKeyEngine {
    ChordKeyEngine::builder()
        .build()
        .expect("Failed to create test engine")
}

pub fn press_note(engine: &mut ChordKeyEngine, key: usize) -> Action {
    let keycode = engine.controller().keymap().note_codes[key];
    engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode })
}

pub fn release_note(engine: &mut ChordKeyEngine, key: usize) -> Action {
    let keycode = engine.controller().keymap().note_codes[key];
    engine.handle_input_event(InputEvent::KeyReleased { keyval: 0, keycode })
}

/// Press a digit on the number row (selects slot `digit`).
pub fn press_digit(engine: &mut ChordKeyEngine, digit: u32) -> Action {
    let keycode = if digit == 0 {
        DIGIT_ZERO_KEYCODE
    } else {
        9 + digit
    };
    engine.handle_input_event(InputEvent::KeyPressed {
        keyval: 48 + digit,
        keycode,
    })
}

pub fn press_control(engine: &mut ChordKeyEngine, keycode: u32) -> Action {
    engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode })
}

/// Run one period and collect what it emitted.
pub fn run_period(engine: &mut ChordKeyEngine) -> Vec<MidiEvent> {
    engine.process_period(TEST_PERIOD);
    engine
        .midi_output()
        .map(|out| out.drain_all())
        .unwrap_or_default()
}

/// Raw bytes of every emitted event, in order.
pub fn wire(events: &[MidiEvent]) -> Vec<Vec<u8>> {
    events.iter().map(|e| e.to_bytes()).collect()
}
