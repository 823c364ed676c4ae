//! # Scripted Performance
//!
//! Plays a short scripted session through the chord controller and prints
//! the MIDI it emits: a major chord, a chord recorded into a user slot, and
//! an inversion.
//!
//! **Concepts:** `InputEvent`, manual period driving, chord recording
//!
//! ```bash
//! cargo run --example scripted_performance
//! RUST_LOG=debug cargo run --example scripted_performance
//! ```

use chordkey::prelude::*;

const PERIOD: usize = 256;
const ENTER: u32 = 36;
const BRACKET_RIGHT: u32 = 35;

fn key(engine: &ChordKeyEngine, index: usize) -> u32 {
    engine.controller().keymap().note_codes[index]
}

fn tap(engine: &mut ChordKeyEngine, index: usize) {
    let keycode = key(engine, index);
    engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode });
    flush(engine, "press");
    engine.handle_input_event(InputEvent::KeyReleased { keyval: 0, keycode });
    flush(engine, "release");
}

fn flush(engine: &mut ChordKeyEngine, label: &str) {
    engine.process_period(PERIOD);
    let events = engine
        .midi_output()
        .map(|out| out.drain_all())
        .unwrap_or_default();
    if events.is_empty() {
        return;
    }
    let bytes: Vec<String> = events
        .iter()
        .map(|e| {
            e.to_bytes()
                .iter()
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    println!("  {label:<8} {}", bytes.join(" | "));
}

fn main() -> chordkey::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut engine = ChordKeyEngine::builder().base_note(60).volume(100).build()?;
    if !engine.start() {
        println!("No audio backend; driving the emitter by hand.\n");
    }

    println!("Major chord on key 0:");
    engine.handle_input_event(InputEvent::KeyPressed {
        keyval: 49,
        keycode: 10,
    });
    tap(&mut engine, 0);

    println!("\nRecording [2, 5, 9] into slot 5:");
    let slot = SlotId::new(5)?;
    engine.handle_input_event(InputEvent::SlotClicked {
        slot,
        button: MouseButton::Secondary,
    });
    for index in [2, 5, 9] {
        let keycode = key(&engine, index);
        engine.handle_input_event(InputEvent::KeyPressed { keyval: 0, keycode });
        engine.handle_input_event(InputEvent::KeyReleased { keyval: 0, keycode });
    }
    let action = engine.handle_input_event(InputEvent::KeyPressed {
        keyval: 0,
        keycode: ENTER,
    });
    println!("  {action:?}");
    tap(&mut engine, 0);

    println!("\nInverting up:");
    engine.handle_input_event(InputEvent::KeyPressed {
        keyval: 0,
        keycode: BRACKET_RIGHT,
    });
    println!("  slot 5 now {}", engine.controller().current_definition());
    tap(&mut engine, 0);

    println!("\nSlots:");
    for info in engine.controller().slots() {
        let marker = if info.is_current { '*' } else { ' ' };
        match info.definition {
            Some(definition) => println!("  {marker} {} {:<10} {definition}", info.slot, info.name),
            None => println!("  {marker} {} {}", info.slot, info.name),
        }
    }

    println!("\n{:?}", engine.stats());
    Ok(())
}
