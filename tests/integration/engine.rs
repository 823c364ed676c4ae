//! Engine construction and backend fallback tests

use crate::helpers::*;
use chordkey::prelude::*;
use chordkey::{ControllerConfig, EngineStats, KeyMap};

#[test]
fn test_builder_applies_settings() {
    let engine = ChordKeyEngine::builder()
        .base_note(48)
        .volume(90)
        .channel(2)
        .build()
        .unwrap();

    let controller = engine.controller();
    assert_eq!(controller.base_note(), 48);
    assert_eq!(controller.volume(), 90);
    assert_eq!(controller.current_slot(), SlotId::NO_CHORD);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = ChordKeyEngine::builder().channel(16).build();
    assert!(matches!(result, Err(chordkey::Error::Core(_))));

    let result = ChordKeyEngine::builder().queue_capacity(0).build();
    assert!(result.is_err());
}

#[test]
fn test_builder_accepts_serialized_config() {
    let config: ControllerConfig =
        serde_json::from_str(r#"{ "base_note": 36, "volume": 64, "channel": 9 }"#).unwrap();
    let mut engine = ChordKeyEngine::builder().config(config).build().unwrap();

    press_note(&mut engine, 0);
    let events = run_period(&mut engine);
    assert_eq!(wire(&events), vec![vec![0x99, 36, 64]]);
}

#[test]
fn test_custom_keymap() {
    let mut keymap = KeyMap::default();
    keymap.note_codes[0] = 200;
    let mut engine = ChordKeyEngine::builder().keymap(keymap).build().unwrap();

    assert_eq!(
        engine.handle_input_event(InputEvent::KeyPressed {
            keyval: 0,
            keycode: 52
        }),
        Action::Ignored(Rejection::UnknownInput)
    );
    assert!(press_note(&mut engine, 0).is_accepted());
}

#[cfg(not(feature = "audio"))]
#[test]
fn test_start_without_audio_backend_keeps_working() {
    let mut engine = test_engine();
    assert!(!engine.start());
    assert!(!engine.start());
    assert!(!engine.is_audio_running());

    press_digit(&mut engine, 1);
    press_note(&mut engine, 0);
    let events = run_period(&mut engine);
    assert_eq!(events.len(), 3);
}

#[test]
fn test_take_emitter_for_host_driving() {
    let mut engine = test_engine();
    let mut emitter = engine.take_emitter().unwrap();
    assert!(engine.take_emitter().is_none());

    press_note(&mut engine, 2);
    assert_eq!(engine.process_period(TEST_PERIOD), 0);

    let mut events = Vec::new();
    emitter.process(TEST_PERIOD, &mut events);
    assert_eq!(wire(&events), vec![vec![0x90, 62, 127]]);
}

#[test]
fn test_stats_track_periods_and_drops() {
    let mut engine = test_engine();
    assert_eq!(engine.stats(), EngineStats::default());

    for _ in 0..6 {
        press_control(&mut engine, 21);
    }
    press_note(&mut engine, 0);
    run_period(&mut engine);
    run_period(&mut engine);

    let stats = engine.stats();
    assert_eq!(stats.periods, 2);
    assert_eq!(stats.dropped_notes, 1);
    assert_eq!(stats.dropped_events, 0);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["dropped_notes"], 1);
}

#[test]
fn test_full_midi_channel_counts_dropped_events() {
    let mut engine = ChordKeyEngine::builder().midi_capacity(2).build().unwrap();
    press_digit(&mut engine, 1);
    press_note(&mut engine, 0);
    assert_eq!(engine.process_period(TEST_PERIOD), 2);
    assert_eq!(engine.stats().dropped_events, 1);
}
