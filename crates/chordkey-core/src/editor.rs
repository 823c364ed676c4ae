//! Interactive chord capture.
//!
//! `Idle -> Recording { slot, position } -> Idle`, leaving through commit or
//! cancel. The slot being recorded is current and active for the whole
//! capture, holding the notes entered so far.

use crate::chord::{ChordDefinition, ChordStore, SlotId};
use crate::error::Rejection;
use crate::keys::KeyIndex;

type Outcome<T> = core::result::Result<T, Rejection>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Recording { slot: SlotId, position: usize },
}

/// What a cancel puts back.
#[derive(Clone, Copy, Debug)]
struct Restore {
    current: SlotId,
    definition: Option<ChordDefinition>,
}

#[derive(Debug, Default)]
pub struct ChordEditor {
    state: EditorState,
    draft: ChordDefinition,
    restore: Option<Restore>,
}

impl ChordEditor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> EditorState {
        self.state
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, EditorState::Recording { .. })
    }

    /// Notes captured so far in the current recording.
    pub fn draft(&self) -> &ChordDefinition {
        &self.draft
    }

    /// Start recording into a user slot. The slot is emptied and made
    /// current. Returns the slot that was current before.
    pub fn begin(&mut self, store: &mut ChordStore, slot: SlotId) -> Outcome<SlotId> {
        if self.is_recording() {
            return Err(Rejection::EditInProgress);
        }
        let definition = store.replace_definition(slot, Some(ChordDefinition::empty()))?;
        let current = store.select(slot)?;
        self.restore = Some(Restore {
            current,
            definition,
        });
        self.draft = ChordDefinition::empty();
        self.state = EditorState::Recording { slot, position: 0 };
        Ok(current)
    }

    /// Append `key` to the chord. Returns the new length.
    pub fn record(&mut self, store: &mut ChordStore, key: KeyIndex) -> Outcome<usize> {
        let EditorState::Recording { slot, position } = self.state else {
            return Err(Rejection::NotEditing);
        };
        self.draft.push(key.index() as i32)?;
        store.replace_definition(slot, Some(self.draft))?;
        let position = position + 1;
        self.state = EditorState::Recording { slot, position };
        Ok(position)
    }

    /// Finish recording. The slot keeps the captured chord and stays current.
    pub fn commit(&mut self, store: &mut ChordStore) -> Outcome<SlotId> {
        let EditorState::Recording { slot, .. } = self.state else {
            return Err(Rejection::NotEditing);
        };
        if store.has_placeholder_name(slot) {
            store.rename(slot, format!("Chord {slot}"))?;
        }
        self.state = EditorState::Idle;
        self.restore = None;
        Ok(slot)
    }

    /// Abandon recording: the slot gets its old definition back (or turns
    /// inactive again) and the previous selection is restored.
    pub fn cancel(&mut self, store: &mut ChordStore) -> Outcome<SlotId> {
        let EditorState::Recording { slot, .. } = self.state else {
            return Err(Rejection::NotEditing);
        };
        self.state = EditorState::Idle;
        self.draft = ChordDefinition::empty();
        let Some(restore) = self.restore.take() else {
            return Ok(store.current());
        };
        store.select(restore.current)?;
        store.replace_definition(slot, restore.definition)?;
        Ok(restore.current)
    }
}
