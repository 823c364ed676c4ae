//! Registry of the ten chord slots and the current selection.

use super::{ChordDefinition, Inversion, SlotId, BUILTIN_CHORDS, NUM_SLOTS};
use crate::error::Rejection;

type Outcome<T> = core::result::Result<T, Rejection>;

const EMPTY_SLOT_NAME: &str = "Empty";

/// One slot: a display name and, when active, its definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordSlot {
    name: String,
    definition: Option<ChordDefinition>,
}

impl ChordSlot {
    fn empty() -> Self {
        Self {
            name: EMPTY_SLOT_NAME.to_string(),
            definition: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> Option<&ChordDefinition> {
        self.definition.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.definition.is_some()
    }
}

/// Read-only view of a slot for UI listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInfo<'a> {
    pub slot: SlotId,
    pub name: &'a str,
    pub definition: Option<&'a ChordDefinition>,
    pub is_current: bool,
}

/// Built-in chords in slots 0–4, user slots 5–9, and the current selection.
///
/// The current slot is always active.
#[derive(Clone, Debug)]
pub struct ChordStore {
    slots: [ChordSlot; NUM_SLOTS],
    current: SlotId,
}

impl ChordStore {
    pub fn new() -> Self {
        let slots = core::array::from_fn(|i| match BUILTIN_CHORDS.get(i) {
            Some((name, definition)) => ChordSlot {
                name: (*name).to_string(),
                definition: Some(*definition),
            },
            None => ChordSlot::empty(),
        });
        Self {
            slots,
            current: SlotId::NO_CHORD,
        }
    }

    #[inline]
    pub fn current(&self) -> SlotId {
        self.current
    }

    /// Definition of the current slot.
    pub fn current_definition(&self) -> ChordDefinition {
        self.definition(self.current).copied().unwrap_or_default()
    }

    /// `None` when the slot is inactive.
    pub fn definition(&self, slot: SlotId) -> Option<&ChordDefinition> {
        self.slots[slot.index()].definition.as_ref()
    }

    pub fn is_active(&self, slot: SlotId) -> bool {
        self.slots[slot.index()].is_active()
    }

    pub fn slot(&self, slot: SlotId) -> &ChordSlot {
        &self.slots[slot.index()]
    }

    pub fn name(&self, slot: SlotId) -> &str {
        &self.slots[slot.index()].name
    }

    /// True while a slot still carries the placeholder name it gets when
    /// empty.
    pub fn has_placeholder_name(&self, slot: SlotId) -> bool {
        self.slots[slot.index()].name == EMPTY_SLOT_NAME
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotInfo<'_>> + '_ {
        SlotId::all().map(move |slot| {
            let entry = &self.slots[slot.index()];
            SlotInfo {
                slot,
                name: &entry.name,
                definition: entry.definition.as_ref(),
                is_current: slot == self.current,
            }
        })
    }

    /// Make `slot` current. Inactive slots are rejected and the selection
    /// stays where it was.
    pub fn select(&mut self, slot: SlotId) -> Outcome<SlotId> {
        if !self.is_active(slot) {
            return Err(Rejection::InactiveSlotSelected(slot));
        }
        let previous = self.current;
        self.current = slot;
        Ok(previous)
    }

    /// Replace a user slot's definition and mark it active.
    pub fn set_definition(&mut self, slot: SlotId, definition: ChordDefinition) -> Outcome<()> {
        self.replace_definition(slot, Some(definition)).map(|_| ())
    }

    /// Swap a user slot's definition (or deactivate it with `None`) and
    /// return the old one. Deactivating the current slot is refused.
    pub(crate) fn replace_definition(
        &mut self,
        slot: SlotId,
        definition: Option<ChordDefinition>,
    ) -> Outcome<Option<ChordDefinition>> {
        if slot.is_builtin() {
            return Err(Rejection::ImmutableSlot(slot));
        }
        if definition.is_none() && slot == self.current {
            return Err(Rejection::InactiveSlotSelected(slot));
        }
        let entry = &mut self.slots[slot.index()];
        let previous = core::mem::replace(&mut entry.definition, definition);
        if entry.definition.is_none() {
            entry.name = EMPTY_SLOT_NAME.to_string();
        }
        Ok(previous)
    }

    /// Rename an active user slot.
    pub fn rename(&mut self, slot: SlotId, name: impl Into<String>) -> Outcome<()> {
        if slot.is_builtin() {
            return Err(Rejection::ImmutableSlot(slot));
        }
        let entry = &mut self.slots[slot.index()];
        if !entry.is_active() {
            return Err(Rejection::InactiveSlotSelected(slot));
        }
        entry.name = name.into();
        Ok(())
    }

    /// Invert the current slot's chord in place. Built-ins included: an
    /// inversion revoices the chord, it does not replace it.
    ///
    /// Returns the new definition, or `None` for an empty chord.
    pub fn invert_current(&mut self, inversion: Inversion) -> Option<ChordDefinition> {
        let definition = self.slots[self.current.index()].definition.as_mut()?;
        inversion.apply(definition).then_some(*definition)
    }
}

impl Default for ChordStore {
    fn default() -> Self {
        Self::new()
    }
}
