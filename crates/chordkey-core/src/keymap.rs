//! Hardware-code tables and input classification.
//!
//! Inputs arrive as `(keyval, keycode)` pairs: the logical key value the
//! windowing system reports and the raw hardware code. Note keys, the keypad
//! and the control keys are matched on the hardware code; the digit row is
//! matched on the logical value so it follows the user's layout.

use crate::chord::{Direction, Inversion, SlotId, NUM_SLOTS, OCTAVE};
use crate::error::{Error, Result};
use crate::keys::{KeyIndex, NUM_KEYS};
use serde::{Deserialize, Serialize};

/// Logical value of the `0` key; `0`..`9` are contiguous.
const DIGIT_ZERO_KEYVAL: u32 = 48;

/// Which classifier applies to a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Performance,
    Editing,
}

/// A non-note key press, decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    SelectSlot(SlotId),
    Navigate(Direction),
    Invert(Inversion),
    /// Semitones to add to the base note.
    Transpose(i32),
    Commit,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowCodes {
    pub up: u32,
    pub down: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for ArrowCodes {
    fn default() -> Self {
        Self {
            up: 111,
            down: 116,
            left: 113,
            right: 114,
        }
    }
}

/// Hardware-code tables. Defaults match a standard X11 PC keyboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    /// Codes of the 17 note keys, lowest key first.
    pub note_codes: [u32; NUM_KEYS],
    /// Keypad codes selecting slots 0..9.
    pub keypad_codes: [u32; NUM_SLOTS],
    pub arrows: ArrowCodes,
    pub invert_down: u32,
    pub invert_up: u32,
    pub octave_down: u32,
    pub octave_up: u32,
    pub commit_codes: Vec<u32>,
    pub cancel_codes: Vec<u32>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            note_codes: [
                52, 39, 53, 40, 54, 55, 42, 56, 43, 57, 44, 58, 59, 46, 60, 47, 61,
            ],
            keypad_codes: [90, 87, 88, 89, 83, 84, 85, 79, 80, 81],
            arrows: ArrowCodes::default(),
            invert_down: 34,
            invert_up: 35,
            octave_down: 20,
            octave_up: 21,
            commit_codes: vec![36, 104, 24],
            cancel_codes: vec![9],
        }
    }
}

impl KeyMap {
    /// Note key bound to `keycode`, if any.
    pub fn note_key(&self, keycode: u32) -> Option<KeyIndex> {
        self.note_codes
            .iter()
            .position(|code| *code == keycode)
            .and_then(|i| KeyIndex::new(i).ok())
    }

    /// Decode a non-note press for the given mode.
    pub fn control(&self, keyval: u32, keycode: u32, mode: InputMode) -> Option<KeyCommand> {
        match mode {
            InputMode::Performance => self.performance_control(keyval, keycode),
            InputMode::Editing => self.editing_control(keycode),
        }
    }

    fn performance_control(&self, keyval: u32, keycode: u32) -> Option<KeyCommand> {
        if let Some(slot) = self.keypad_codes.iter().position(|code| *code == keycode) {
            return SlotId::new(slot).ok().map(KeyCommand::SelectSlot);
        }
        if let Some(digit) = keyval.checked_sub(DIGIT_ZERO_KEYVAL) {
            if (digit as usize) < NUM_SLOTS {
                return SlotId::new(digit as usize).ok().map(KeyCommand::SelectSlot);
            }
        }
        let arrows = &self.arrows;
        let command = match keycode {
            c if c == arrows.down => KeyCommand::Navigate(Direction::Down),
            c if c == arrows.up => KeyCommand::Navigate(Direction::Up),
            c if c == arrows.left => KeyCommand::Navigate(Direction::Left),
            c if c == arrows.right => KeyCommand::Navigate(Direction::Right),
            c if c == self.invert_down => KeyCommand::Invert(Inversion::Down),
            c if c == self.invert_up => KeyCommand::Invert(Inversion::Up),
            c if c == self.octave_down => KeyCommand::Transpose(-OCTAVE),
            c if c == self.octave_up => KeyCommand::Transpose(OCTAVE),
            _ => return None,
        };
        Some(command)
    }

    fn editing_control(&self, keycode: u32) -> Option<KeyCommand> {
        if self.commit_codes.contains(&keycode) {
            Some(KeyCommand::Commit)
        } else if self.cancel_codes.contains(&keycode) {
            Some(KeyCommand::Cancel)
        } else {
            None
        }
    }

    /// Reject tables where one hardware code means two things.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<(u32, &str)> = Vec::new();
        let mut claim = |code: u32, role: &'static str| -> Result<()> {
            if let Some((_, other)) = seen.iter().find(|(c, _)| *c == code) {
                return Err(Error::InvalidConfig(format!(
                    "keycode {code} bound to both {other} and {role}"
                )));
            }
            seen.push((code, role));
            Ok(())
        };
        for code in self.note_codes {
            claim(code, "a note key")?;
        }
        for code in self.keypad_codes {
            claim(code, "a keypad slot")?;
        }
        let arrows = self.arrows;
        for code in [arrows.up, arrows.down, arrows.left, arrows.right] {
            claim(code, "an arrow")?;
        }
        claim(self.invert_down, "invert down")?;
        claim(self.invert_up, "invert up")?;
        claim(self.octave_down, "octave down")?;
        claim(self.octave_up, "octave up")?;

        // Commit and cancel only apply while editing, so they may overlap
        // performance controls but not each other or the note keys.
        for code in &self.commit_codes {
            if self.note_codes.contains(code) || self.cancel_codes.contains(code) {
                return Err(Error::InvalidConfig(format!(
                    "commit keycode {code} is also a note or cancel key"
                )));
            }
        }
        for code in &self.cancel_codes {
            if self.note_codes.contains(code) {
                return Err(Error::InvalidConfig(format!(
                    "cancel keycode {code} is also a note key"
                )));
            }
        }
        Ok(())
    }
}
