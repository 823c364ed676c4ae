//! Input dispatcher: the single entry point of the event context.
//!
//! [`ChordController`] owns the chord store, the key state table, the editor
//! and the key map. Every raw input goes through
//! [`ChordController::handle_input_event`], which classifies it, applies it
//! and reports what happened as an [`Action`]. Ignored input comes back as
//! [`Action::Ignored`] with the reason.

use crate::chord::{ChordDefinition, ChordStore, Direction, Inversion, SlotId, SlotInfo};
use crate::config::ControllerConfig;
use crate::editor::{ChordEditor, EditorState};
use crate::emitter::MidiEmitter;
use crate::error::{Rejection, Result};
use crate::keymap::{InputMode, KeyCommand, KeyMap};
use crate::keys::{KeyIndex, KeyState, KeyStateTable};
use crate::transition::{transition_channel, SharedKeyState};
use std::sync::Arc;
use tracing::debug;

type Outcome<T> = core::result::Result<T, Rejection>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Selects the slot.
    Primary,
    /// Starts recording into the slot.
    Secondary,
}

/// Raw input from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed { keyval: u32, keycode: u32 },
    KeyReleased { keyval: u32, keycode: u32 },
    SlotClicked { slot: SlotId, button: MouseButton },
    VolumeChanged(i32),
}

/// Result of one input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// A note key went down and its chord was queued.
    NotePressed { key: KeyIndex, slot: SlotId },
    /// A note key went down but the transition queue was full. The key is
    /// held and stays silent until released.
    NoteDropped { key: KeyIndex, slot: SlotId },
    /// A sounding key went up and its Note-Off was queued.
    NoteReleased { key: KeyIndex },
    /// A key went up without MIDI (it was recorded or never sounded).
    KeyReleased { key: KeyIndex },
    SlotSelected { previous: SlotId, current: SlotId },
    Inverted {
        slot: SlotId,
        definition: ChordDefinition,
    },
    Transposed { base_note: i32 },
    EditStarted { slot: SlotId, previous: SlotId },
    NoteRecorded { key: KeyIndex, position: usize },
    EditCommitted {
        slot: SlotId,
        definition: ChordDefinition,
    },
    EditCancelled { slot: SlotId, restored: SlotId },
    VolumeChanged { volume: u8 },
    Ignored(Rejection),
}

impl Action {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Action::Ignored(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Action::Ignored(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

/// Input capture priority the host should give the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureLevel {
    /// Widgets see keys first.
    Normal,
    /// The controller sees keys first, so Enter and Escape reach the editor.
    Elevated,
}

pub struct ChordController {
    store: ChordStore,
    keys: KeyStateTable,
    editor: ChordEditor,
    keymap: KeyMap,
    base_note: i32,
}

impl ChordController {
    /// Build a controller and the emitter that drains it.
    pub fn with_emitter(config: ControllerConfig) -> Result<(Self, MidiEmitter)> {
        config.validate()?;
        let shared = Arc::new(SharedKeyState::new(config.volume));
        let (producer, consumer) = transition_channel(config.queue_capacity);
        let store = ChordStore::new();
        let keys = KeyStateTable::new(
            store.current(),
            store.current_definition(),
            config.base_note,
            producer,
            Arc::clone(&shared),
        );
        let emitter = MidiEmitter::new(
            consumer,
            shared,
            config.channel,
            config.release_velocity,
        );
        let controller = Self {
            store,
            keys,
            editor: ChordEditor::new(),
            keymap: config.keymap,
            base_note: config.base_note,
        };
        Ok((controller, emitter))
    }

    /// Classify and apply one input.
    pub fn handle_input_event(&mut self, event: InputEvent) -> Action {
        self.sync();
        let outcome = match event {
            InputEvent::KeyPressed { keyval, keycode } => self.key_pressed(keyval, keycode),
            InputEvent::KeyReleased { keycode, .. } => self.key_released(keycode),
            InputEvent::SlotClicked {
                slot,
                button: MouseButton::Primary,
            } => self.click_select(slot),
            InputEvent::SlotClicked {
                slot,
                button: MouseButton::Secondary,
            } => self.begin_edit(slot),
            InputEvent::VolumeChanged(volume) => Ok(self.set_volume(volume)),
        };
        outcome.unwrap_or_else(|rejection| {
            debug!("Ignored {:?}: {}", event, rejection);
            Action::Ignored(rejection)
        })
    }

    /// Apply deferred snapshot refreshes for keys whose release the emitter
    /// has consumed. Runs at the start of every input; hosts that want key
    /// snapshots current between inputs can call it after each period.
    pub fn sync(&mut self) -> usize {
        self.keys
            .reconcile(self.store.current(), self.store.current_definition())
    }

    /// A note code only wins for a released key; a held note key falls
    /// through to the control mapping.
    fn key_pressed(&mut self, keyval: u32, keycode: u32) -> Outcome<Action> {
        let held = match self.keymap.note_key(keycode) {
            Some(key) if !self.keys.is_pressed(key) => {
                return if self.editor.is_recording() {
                    self.record_note(key)
                } else {
                    self.press_note(key)
                };
            }
            held => held,
        };
        let unmatched = held.map_or(Rejection::UnknownInput, Rejection::KeyAlreadyHeld);

        if self.editor.is_recording() {
            return match self.keymap.control(keyval, keycode, InputMode::Editing) {
                Some(KeyCommand::Commit) => self.commit_edit(),
                Some(KeyCommand::Cancel) => self.cancel_edit(),
                _ => Err(unmatched),
            };
        }
        match self.keymap.control(keyval, keycode, InputMode::Performance) {
            Some(KeyCommand::SelectSlot(slot)) => self.select_slot(slot),
            Some(KeyCommand::Navigate(direction)) => self.navigate(direction),
            Some(KeyCommand::Invert(inversion)) => self.invert(inversion),
            Some(KeyCommand::Transpose(semitones)) => Ok(self.transpose(semitones)),
            Some(KeyCommand::Commit | KeyCommand::Cancel) | None => Err(unmatched),
        }
    }

    fn key_released(&mut self, keycode: u32) -> Outcome<Action> {
        let key = self.keymap.note_key(keycode).ok_or(Rejection::UnknownInput)?;
        if self.keys.release(key)? {
            Ok(Action::NoteReleased { key })
        } else {
            Ok(Action::KeyReleased { key })
        }
    }

    fn press_note(&mut self, key: KeyIndex) -> Outcome<Action> {
        let slot = self.store.current();
        let chord = self.store.current_definition();
        if self.keys.press(key, slot, chord, self.base_note)? {
            Ok(Action::NotePressed { key, slot })
        } else {
            Ok(Action::NoteDropped { key, slot })
        }
    }

    fn record_note(&mut self, key: KeyIndex) -> Outcome<Action> {
        let position = self.editor.record(&mut self.store, key)?;
        self.keys.record_press(key)?;
        Ok(Action::NoteRecorded { key, position })
    }

    fn click_select(&mut self, slot: SlotId) -> Outcome<Action> {
        if self.editor.is_recording() {
            return Err(Rejection::EditInProgress);
        }
        self.select_slot(slot)
    }

    fn navigate(&mut self, direction: Direction) -> Outcome<Action> {
        let target = self.store.current().navigate(direction);
        self.select_slot(target)
    }

    fn propagate_selection(&mut self) {
        self.keys
            .selection_changed(self.store.current(), self.store.current_definition());
    }

    /// Make `slot` current. Inactive slots are refused and nothing changes.
    pub fn select_slot(&mut self, slot: SlotId) -> Outcome<Action> {
        if self.editor.is_recording() {
            return Err(Rejection::EditInProgress);
        }
        let previous = self.store.select(slot)?;
        self.propagate_selection();
        debug!("Selected chord slot {} ({})", slot, self.store.name(slot));
        Ok(Action::SlotSelected {
            previous,
            current: slot,
        })
    }

    /// Invert the current chord in place. Held keys keep the voicing they
    /// were pressed with. An empty chord is left alone and reported.
    pub fn invert(&mut self, inversion: Inversion) -> Outcome<Action> {
        let slot = self.store.current();
        let definition = self
            .store
            .invert_current(inversion)
            .ok_or(Rejection::EmptyChord(slot))?;
        self.propagate_selection();
        debug!("Inverted slot {} {:?}: {}", slot, inversion, definition);
        Ok(Action::Inverted { slot, definition })
    }

    /// Shift the base note. No bound is enforced; notes that land outside
    /// the MIDI range are dropped at emission.
    pub fn transpose(&mut self, semitones: i32) -> Action {
        self.base_note = self.base_note.saturating_add(semitones);
        debug!("Base note now {}", self.base_note);
        Action::Transposed {
            base_note: self.base_note,
        }
    }

    pub fn set_volume(&mut self, volume: i32) -> Action {
        let volume = self.keys.shared().set_volume(volume);
        Action::VolumeChanged { volume }
    }

    /// Start recording a chord into a user slot.
    pub fn begin_edit(&mut self, slot: SlotId) -> Outcome<Action> {
        let previous = self.editor.begin(&mut self.store, slot)?;
        debug!("Recording chord into slot {}", slot);
        Ok(Action::EditStarted { slot, previous })
    }

    pub fn commit_edit(&mut self) -> Outcome<Action> {
        let slot = self.editor.commit(&mut self.store)?;
        self.propagate_selection();
        let definition = self.store.current_definition();
        debug!("Committed slot {}: {}", slot, definition);
        Ok(Action::EditCommitted { slot, definition })
    }

    pub fn cancel_edit(&mut self) -> Outcome<Action> {
        let EditorState::Recording { slot, .. } = self.editor.state() else {
            return Err(Rejection::NotEditing);
        };
        let restored = self.editor.cancel(&mut self.store)?;
        self.propagate_selection();
        debug!("Cancelled recording into slot {}", slot);
        Ok(Action::EditCancelled { slot, restored })
    }

    /// Replace a user slot's chord directly, outside the editor.
    pub fn set_definition(&mut self, slot: SlotId, definition: ChordDefinition) -> Outcome<()> {
        if self.editor.is_recording() {
            return Err(Rejection::EditInProgress);
        }
        self.store.set_definition(slot, definition)?;
        if slot == self.store.current() {
            self.propagate_selection();
        }
        Ok(())
    }

    pub fn rename_slot(&mut self, slot: SlotId, name: impl Into<String>) -> Outcome<()> {
        self.store.rename(slot, name)
    }

    #[inline]
    pub fn definition(&self, slot: SlotId) -> Option<&ChordDefinition> {
        self.store.definition(slot)
    }

    #[inline]
    pub fn current_slot(&self) -> SlotId {
        self.store.current()
    }

    pub fn current_definition(&self) -> ChordDefinition {
        self.store.current_definition()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotInfo<'_>> + '_ {
        self.store.slots()
    }

    pub fn store(&self) -> &ChordStore {
        &self.store
    }

    #[inline]
    pub fn base_note(&self) -> i32 {
        self.base_note
    }

    pub fn volume(&self) -> u8 {
        self.keys.shared().volume()
    }

    pub fn is_pressed(&self, key: KeyIndex) -> bool {
        self.keys.is_pressed(key)
    }

    pub fn is_dirty(&self, key: KeyIndex) -> bool {
        self.keys.is_dirty(key)
    }

    pub fn key_state(&self, key: KeyIndex) -> &KeyState {
        self.keys.state(key)
    }

    pub fn editor_state(&self) -> EditorState {
        self.editor.state()
    }

    pub fn input_mode(&self) -> InputMode {
        if self.editor.is_recording() {
            InputMode::Editing
        } else {
            InputMode::Performance
        }
    }

    pub fn capture(&self) -> CaptureLevel {
        if self.editor.is_recording() {
            CaptureLevel::Elevated
        } else {
            CaptureLevel::Normal
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// State shared with the emitter: volume, dirty markers, counters.
    pub fn shared(&self) -> &Arc<SharedKeyState> {
        self.keys.shared()
    }
}
