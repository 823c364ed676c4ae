//! Chord inversion.
//!
//! Each call moves the current extreme note by an octave. The two operations
//! are not mutual inverses: after one call the extreme may be a different
//! note, so `invert_up` followed by `invert_down` only restores the chord
//! when the raised note became the new maximum.

use super::{ChordDefinition, OCTAVE};

/// Which way to invert the current chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inversion {
    /// Drop the highest note by an octave.
    Down,
    /// Raise the lowest note by an octave.
    Up,
}

impl Inversion {
    /// Returns false when the chord is empty and nothing changed.
    pub fn apply(self, chord: &mut ChordDefinition) -> bool {
        match self {
            Inversion::Down => invert_down(chord),
            Inversion::Up => invert_up(chord),
        }
    }
}

/// Lower the highest offset by an octave. Ties pick the first occurrence.
pub fn invert_down(chord: &mut ChordDefinition) -> bool {
    let offsets = chord.as_mut_slice();
    let Some(highest) = extreme_index(offsets, |candidate, best| candidate > best) else {
        return false;
    };
    offsets[highest] -= OCTAVE;
    true
}

/// Raise the lowest offset by an octave. Ties pick the first occurrence.
pub fn invert_up(chord: &mut ChordDefinition) -> bool {
    let offsets = chord.as_mut_slice();
    let Some(lowest) = extreme_index(offsets, |candidate, best| candidate < best) else {
        return false;
    };
    offsets[lowest] += OCTAVE;
    true
}

fn extreme_index(offsets: &[i32], better: impl Fn(i32, i32) -> bool) -> Option<usize> {
    let (first, rest) = offsets.split_first()?;
    let mut best = (0, *first);
    for (i, &offset) in rest.iter().enumerate() {
        if better(offset, best.1) {
            best = (i + 1, offset);
        }
    }
    Some(best.0)
}
