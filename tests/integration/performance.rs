//! End-to-end playing and editing sessions

use crate::helpers::*;
use chordkey::prelude::*;

const ENTER: u32 = 36;
const ESCAPE: u32 = 9;
const BRACKET_LEFT: u32 = 34;
const BRACKET_RIGHT: u32 = 35;
const ARROW_UP: u32 = 111;

#[test]
fn test_major_chord_scenario() {
    let mut engine = test_engine();
    press_digit(&mut engine, 1);
    press_note(&mut engine, 0);
    assert_eq!(
        wire(&run_period(&mut engine)),
        vec![vec![0x90, 60, 127], vec![0x90, 64, 127], vec![0x90, 67, 127]]
    );

    release_note(&mut engine, 0);
    assert_eq!(
        wire(&run_period(&mut engine)),
        vec![vec![0x80, 60, 127], vec![0x80, 64, 127], vec![0x80, 67, 127]]
    );
}

#[test]
fn test_recorded_chord_scenario() {
    let mut engine = test_engine();
    engine.handle_input_event(InputEvent::SlotClicked {
        slot: SlotId::new(5).unwrap(),
        button: MouseButton::Secondary,
    });
    for key in [2, 5, 9] {
        press_note(&mut engine, key);
        release_note(&mut engine, key);
    }
    press_control(&mut engine, ENTER);
    assert!(run_period(&mut engine).is_empty());

    press_note(&mut engine, 0);
    let notes: Vec<_> = run_period(&mut engine)
        .iter()
        .filter_map(|e| e.note())
        .collect();
    assert_eq!(notes, vec![62, 65, 69]);
}

#[test]
fn test_inactive_slot_scenario() {
    let mut engine = test_engine();
    let before = engine.controller().current_slot();
    let action = press_digit(&mut engine, 6);
    assert_eq!(
        action,
        Action::Ignored(Rejection::InactiveSlotSelected(SlotId::new(6).unwrap()))
    );
    assert_eq!(engine.controller().current_slot(), before);
}

#[test]
fn test_chord_change_between_press_and_release() {
    let mut engine = test_engine();
    press_digit(&mut engine, 1);
    press_note(&mut engine, 4);
    run_period(&mut engine);

    press_digit(&mut engine, 3);
    press_note(&mut engine, 7);
    release_note(&mut engine, 4);

    let events = run_period(&mut engine);
    let offs: Vec<_> = events
        .iter()
        .filter(|e| e.is_note_off())
        .filter_map(|e| e.note())
        .collect();
    let ons: Vec<_> = events
        .iter()
        .filter(|e| e.is_note_on())
        .filter_map(|e| e.note())
        .collect();
    assert_eq!(offs, vec![64, 68, 71]);
    assert_eq!(ons, vec![67, 70, 73]);

    // key 4 comes before key 7, and keys sit three frames apart
    assert!(events[..3].iter().all(|e| e.is_note_off() && e.frame_offset == 0));
    assert!(events[3..].iter().all(|e| e.is_note_on() && e.frame_offset == 3));
}

#[test]
fn test_grid_navigation_and_inversion() {
    let mut engine = test_engine();
    press_control(&mut engine, ARROW_UP);
    assert_eq!(engine.controller().current_slot(), SlotId::MAJOR);

    press_control(&mut engine, BRACKET_RIGHT);
    press_note(&mut engine, 0);
    let notes: Vec<_> = run_period(&mut engine)
        .iter()
        .filter_map(|e| e.note())
        .collect();
    assert_eq!(notes, vec![72, 64, 67]);

    release_note(&mut engine, 0);
    press_control(&mut engine, BRACKET_LEFT);
    assert_eq!(
        engine.controller().current_definition().as_slice(),
        &[0, 4, 7]
    );
}

#[test]
fn test_cancelled_edit_leaves_no_trace() {
    let mut engine = test_engine();
    press_digit(&mut engine, 2);
    engine.controller_mut().begin_edit(SlotId::new(7).unwrap()).unwrap();
    press_note(&mut engine, 11);
    press_control(&mut engine, ESCAPE);
    release_note(&mut engine, 11);

    let controller = engine.controller();
    assert_eq!(controller.current_slot(), SlotId::MINOR);
    assert!(controller.definition(SlotId::new(7).unwrap()).is_none());
    assert!(run_period(&mut engine).is_empty());
}

#[test]
fn test_slot_listing_after_rename() {
    let mut engine = test_engine();
    let slot = SlotId::new(9).unwrap();
    engine
        .controller_mut()
        .set_definition(slot, ChordDefinition::from_offsets(&[0, 4, 7, 11]).unwrap())
        .unwrap();
    engine.controller_mut().rename_slot(slot, "Maj7").unwrap();
    engine.handle_input_event(InputEvent::SlotClicked {
        slot,
        button: MouseButton::Primary,
    });

    let names: Vec<_> = engine
        .controller()
        .slots()
        .map(|info| (info.name.to_string(), info.is_current))
        .collect();
    assert_eq!(names[1], ("Major".to_string(), false));
    assert_eq!(names[6], ("Empty".to_string(), false));
    assert_eq!(names[9], ("Maj7".to_string(), true));
}
