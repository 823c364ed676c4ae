//! Note arithmetic helpers.

/// Resolve `base + key + offset` to a MIDI note number.
///
/// Returns `None` when the result is outside 0..=127; callers drop such notes
/// rather than folding them onto the range edges.
#[inline]
pub fn note_number(base_note: i32, key: usize, offset: i32) -> Option<u8> {
    let note = base_note
        .checked_add(key as i32)?
        .checked_add(offset)?;
    u8::try_from(note).ok().filter(|n| *n <= 127)
}

/// Saturate a velocity to the 7-bit MIDI range.
#[inline]
pub fn clamp_velocity(velocity: i32) -> u8 {
    velocity.clamp(0, 127) as u8
}
