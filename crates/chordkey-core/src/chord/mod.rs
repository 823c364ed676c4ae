//! Chord definitions, slot identifiers, inversion math and the chord store.

mod math;
mod store;

pub use math::{invert_down, invert_up, Inversion};
pub use store::{ChordSlot, ChordStore, SlotInfo};

use crate::error::{Error, Rejection, Result};
use core::fmt;

/// Maximum number of offsets in one chord.
pub const MAX_CHORD_LEN: usize = 8;

/// Number of chord slots in the store.
pub const NUM_SLOTS: usize = 10;

/// Slots below this index are built-ins and never overwritten by the editor.
pub const BUILTIN_SLOTS: usize = 5;

/// Semitones per octave.
pub const OCTAVE: i32 = 12;

/// Ordered semitone offsets applied on top of a key's pitch.
///
/// Bounded by [`MAX_CHORD_LEN`] with an explicit length, so no terminator
/// value is needed and `0` (unison) is an ordinary offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordDefinition {
    offsets: [i32; MAX_CHORD_LEN],
    len: u8,
}

impl ChordDefinition {
    pub const fn empty() -> Self {
        Self {
            offsets: [0; MAX_CHORD_LEN],
            len: 0,
        }
    }

    /// Const constructor for built-ins. Extra offsets beyond
    /// [`MAX_CHORD_LEN`] are not representable and must not be passed.
    const fn from_builtin(offsets: &[i32]) -> Self {
        let mut chord = Self::empty();
        let mut i = 0;
        while i < offsets.len() && i < MAX_CHORD_LEN {
            chord.offsets[i] = offsets[i];
            i += 1;
        }
        chord.len = i as u8;
        chord
    }

    pub fn from_offsets(offsets: &[i32]) -> core::result::Result<Self, Rejection> {
        if offsets.len() > MAX_CHORD_LEN {
            return Err(Rejection::ChordFull);
        }
        let mut chord = Self::empty();
        chord.offsets[..offsets.len()].copy_from_slice(offsets);
        chord.len = offsets.len() as u8;
        Ok(chord)
    }

    /// Append an offset. Fails with [`Rejection::ChordFull`] at capacity.
    pub fn push(&mut self, offset: i32) -> core::result::Result<(), Rejection> {
        if self.is_full() {
            return Err(Rejection::ChordFull);
        }
        self.offsets[self.len as usize] = offset;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == MAX_CHORD_LEN
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.offsets[..self.len()]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [i32] {
        let len = self.len();
        &mut self.offsets[..len]
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for ChordDefinition {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ChordDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl fmt::Display for ChordDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index of a chord slot (0..10).
///
/// Slot 0 is the unison "no chord", slots 1–4 the built-in triads and
/// slots 5–9 user slots filled by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u8);

impl SlotId {
    pub const NO_CHORD: SlotId = SlotId(0);
    pub const MAJOR: SlotId = SlotId(1);
    pub const MINOR: SlotId = SlotId(2);
    pub const DIMINISHED: SlotId = SlotId(3);
    pub const AUGMENTED: SlotId = SlotId(4);

    pub fn new(index: usize) -> Result<Self> {
        if index < NUM_SLOTS {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidSlot(index))
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_builtin(self) -> bool {
        self.index() < BUILTIN_SLOTS
    }

    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..NUM_SLOTS as u8).map(SlotId)
    }

    /// Target of a grid move over the 1 + 3×3 slot layout.
    ///
    /// Slot 0 sits alone above three rows of three; Up moves towards the
    /// higher rows and Down back towards slot 0.
    pub fn navigate(self, direction: Direction) -> SlotId {
        let current = self.0;
        let target = match direction {
            Direction::Down => {
                if current < 4 {
                    0
                } else {
                    current - 3
                }
            }
            Direction::Up => {
                if current == 0 {
                    1
                } else if current < 7 {
                    current + 3
                } else {
                    current
                }
            }
            Direction::Left => {
                if current % 3 != 1 && current != 0 {
                    current - 1
                } else {
                    current
                }
            }
            Direction::Right => {
                if current % 3 != 0 {
                    current + 1
                } else {
                    current
                }
            }
        };
        SlotId(target)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arrow-key direction for slot grid navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub(crate) const BUILTIN_CHORDS: [(&str, ChordDefinition); BUILTIN_SLOTS] = [
    ("No Chord", ChordDefinition::from_builtin(&[0])),
    ("Major", ChordDefinition::from_builtin(&[0, 4, 7])),
    ("Minor", ChordDefinition::from_builtin(&[0, 3, 7])),
    ("Diminished", ChordDefinition::from_builtin(&[0, 3, 6])),
    ("Augmented", ChordDefinition::from_builtin(&[0, 4, 8])),
];
