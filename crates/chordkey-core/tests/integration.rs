//! Integration tests for chordkey-core.
//!
//! Drive the controller with raw inputs and run the emitter by hand, the way
//! an audio callback would, checking the MIDI that comes out.

use chordkey_core::{
    Action, ChordController, ChordDefinition, ControllerConfig, InputEvent, KeyIndex, MidiEmitter,
    MouseButton, Rejection, SlotId,
};
use chordkey_midi::MidiEvent;

const ENTER: u32 = 36;
const ESCAPE: u32 = 9;
const BRACKET_RIGHT: u32 = 35;

fn setup() -> (ChordController, MidiEmitter) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    ChordController::with_emitter(ControllerConfig::default()).unwrap()
}

fn key(i: usize) -> KeyIndex {
    KeyIndex::new(i).unwrap()
}

fn slot(i: usize) -> SlotId {
    SlotId::new(i).unwrap()
}

fn note_code(c: &ChordController, k: usize) -> u32 {
    c.keymap().note_codes[k]
}

fn press_key(c: &mut ChordController, k: usize) -> Action {
    let keycode = note_code(c, k);
    c.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode })
}

fn release_key(c: &mut ChordController, k: usize) -> Action {
    let keycode = note_code(c, k);
    c.handle_input_event(InputEvent::KeyReleased { keyval: 0, keycode })
}

fn control(c: &mut ChordController, keycode: u32) -> Action {
    c.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode })
}

fn digit(c: &mut ChordController, d: u32) -> Action {
    c.handle_input_event(InputEvent::KeyPressed {
        keyval: 48 + d,
        keycode: 10 + d,
    })
}

fn period(emitter: &mut MidiEmitter) -> Vec<MidiEvent> {
    let mut events = Vec::new();
    emitter.process(256, &mut events);
    events
}

fn ons(events: &[MidiEvent]) -> Vec<u8> {
    events
        .iter()
        .filter(|e| e.is_note_on())
        .filter_map(|e| e.note())
        .collect()
}

fn offs(events: &[MidiEvent]) -> Vec<u8> {
    events
        .iter()
        .filter(|e| e.is_note_off())
        .filter_map(|e| e.note())
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Basic performance
// ---------------------------------------------------------------------------

#[test]
fn test_major_chord_on_key_zero() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    press_key(&mut c, 0);

    let events = period(&mut emitter);
    assert_eq!(ons(&events), vec![60, 64, 67]);
    assert!(events.iter().all(|e| e.velocity() == Some(127)));
    assert!(events.iter().all(|e| e.channel_num() == 0));

    release_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(offs(&events), vec![60, 64, 67]);

    assert!(period(&mut emitter).is_empty());
}

#[test]
fn test_wire_bytes() {
    let (mut c, mut emitter) = setup();
    press_key(&mut c, 4);
    let events = period(&mut emitter);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].to_bytes(), vec![0x90, 64, 127]);

    release_key(&mut c, 4);
    let events = period(&mut emitter);
    assert_eq!(events[0].to_bytes(), vec![0x80, 64, 127]);
}

#[test]
fn test_release_velocity_config() {
    let config = ControllerConfig {
        release_velocity: Some(0),
        channel: 3,
        ..Default::default()
    };
    let (mut c, mut emitter) = ChordController::with_emitter(config).unwrap();
    press_key(&mut c, 0);
    release_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].to_bytes(), vec![0x83, 60, 0]);
}

#[test]
fn test_volume_applies_to_later_periods() {
    let (mut c, mut emitter) = setup();
    c.handle_input_event(InputEvent::VolumeChanged(80));
    press_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(events[0].velocity(), Some(80));
}

#[test]
fn test_keys_emitted_in_index_order() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 2);
    press_key(&mut c, 7);
    press_key(&mut c, 3);
    press_key(&mut c, 12);

    let events = period(&mut emitter);
    assert_eq!(
        ons(&events),
        vec![63, 66, 70, 67, 70, 74, 72, 75, 79]
    );
}

// ---------------------------------------------------------------------------
// 2. Snapshot isolation
// ---------------------------------------------------------------------------

#[test]
fn test_release_after_selection_change_uses_press_chord() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    press_key(&mut c, 0);
    period(&mut emitter);

    digit(&mut c, 2);
    assert_eq!(c.key_state(key(0)).materialized.as_slice(), &[0, 4, 7]);

    release_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(offs(&events), vec![60, 64, 67]);

    press_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(ons(&events), vec![60, 63, 67]);
}

#[test]
fn test_deferred_refresh_applied_after_release_consumed() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    press_key(&mut c, 5);
    digit(&mut c, 3);
    release_key(&mut c, 5);
    assert!(c.key_state(key(5)).deferred_refresh);

    period(&mut emitter);
    assert_eq!(c.sync(), 1);
    let state = c.key_state(key(5));
    assert!(!state.deferred_refresh);
    assert_eq!(state.assigned_slot, SlotId::DIMINISHED);
    assert_eq!(state.materialized.as_slice(), &[0, 3, 6]);
}

#[test]
fn test_transpose_while_held_keeps_note_off_matched() {
    let (mut c, mut emitter) = setup();
    press_key(&mut c, 0);
    period(&mut emitter);
    control(&mut c, 21);
    release_key(&mut c, 0);
    assert_eq!(offs(&period(&mut emitter)), vec![60]);

    press_key(&mut c, 0);
    assert_eq!(ons(&period(&mut emitter)), vec![72]);
}

#[test]
fn test_inversion_while_held() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    press_key(&mut c, 0);
    control(&mut c, BRACKET_RIGHT);
    release_key(&mut c, 0);
    let events = period(&mut emitter);
    assert_eq!(ons(&events), vec![60, 64, 67]);
    assert_eq!(offs(&events), vec![60, 64, 67]);

    press_key(&mut c, 0);
    assert_eq!(ons(&period(&mut emitter)), vec![72, 64, 67]);
}

#[test]
fn test_press_and_release_in_one_period() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 4);
    press_key(&mut c, 1);
    release_key(&mut c, 1);
    let events = period(&mut emitter);
    assert_eq!(events.len(), 6);
    assert!(events[..3].iter().all(|e| e.is_note_on()));
    assert!(events[3..].iter().all(|e| e.is_note_off()));
    assert!(!c.is_dirty(key(1)));
}

// ---------------------------------------------------------------------------
// 3. Editing
// ---------------------------------------------------------------------------

#[test]
fn test_record_user_chord() {
    let (mut c, mut emitter) = setup();
    c.handle_input_event(InputEvent::SlotClicked {
        slot: slot(5),
        button: MouseButton::Secondary,
    });
    for k in [2, 5, 9] {
        assert!(press_key(&mut c, k).is_accepted());
        release_key(&mut c, k);
    }
    assert!(period(&mut emitter).is_empty());

    let action = control(&mut c, ENTER);
    assert!(matches!(action, Action::EditCommitted { .. }));
    assert_eq!(c.definition(slot(5)).unwrap().as_slice(), &[2, 5, 9]);
    assert_eq!(c.current_slot(), slot(5));

    press_key(&mut c, 0);
    assert_eq!(ons(&period(&mut emitter)), vec![62, 65, 69]);
}

#[test]
fn test_recording_is_silent_but_held_note_still_stops() {
    let (mut c, mut emitter) = setup();
    press_key(&mut c, 0);
    period(&mut emitter);

    c.begin_edit(slot(8)).unwrap();
    press_key(&mut c, 3);
    assert_eq!(release_key(&mut c, 0), Action::NoteReleased { key: key(0) });

    let events = period(&mut emitter);
    assert_eq!(offs(&events), vec![60]);
    assert!(ons(&events).is_empty());
}

#[test]
fn test_recording_rejects_ninth_note() {
    let (mut c, _emitter) = setup();
    c.begin_edit(slot(9)).unwrap();
    for k in 0..8 {
        press_key(&mut c, k);
    }
    assert_eq!(
        press_key(&mut c, 10),
        Action::Ignored(Rejection::ChordFull)
    );
    assert!(!c.is_pressed(key(10)));
    control(&mut c, ENTER);
    assert_eq!(
        c.definition(slot(9)).unwrap().as_slice(),
        &[0, 1, 2, 3, 4, 5, 6, 7]
    );
}

#[test]
fn test_cancel_edit_restores_previous_state() {
    let (mut c, mut emitter) = setup();
    let triad = ChordDefinition::from_offsets(&[0, 7, 16]).unwrap();
    c.set_definition(slot(6), triad).unwrap();
    digit(&mut c, 3);

    c.begin_edit(slot(6)).unwrap();
    press_key(&mut c, 1);
    let action = control(&mut c, ESCAPE);
    assert_eq!(
        action,
        Action::EditCancelled {
            slot: slot(6),
            restored: SlotId::DIMINISHED
        }
    );
    assert_eq!(c.definition(slot(6)), Some(&triad));
    release_key(&mut c, 1);

    press_key(&mut c, 0);
    assert_eq!(ons(&period(&mut emitter)), vec![60, 63, 66]);
}

// ---------------------------------------------------------------------------
// 4. Selection edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_inactive_slot_selection_keeps_current() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    let action = digit(&mut c, 6);
    assert_eq!(
        action,
        Action::Ignored(Rejection::InactiveSlotSelected(slot(6)))
    );
    assert_eq!(c.current_slot(), SlotId::MAJOR);
    press_key(&mut c, 0);
    assert_eq!(ons(&period(&mut emitter)), vec![60, 64, 67]);
}

#[test]
fn test_out_of_range_notes_are_dropped() {
    let (mut c, mut emitter) = setup();
    digit(&mut c, 1);
    for _ in 0..5 {
        control(&mut c, 21);
    }
    assert_eq!(c.base_note(), 120);
    press_key(&mut c, 3);
    let events = period(&mut emitter);
    assert_eq!(ons(&events), vec![123, 127]);
    assert_eq!(c.shared().dropped_notes.get(), 1);
}
