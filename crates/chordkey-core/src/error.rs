//! Error types for chordkey-core.
//!
//! [`Rejection`] covers input the controller deliberately ignores; it is
//! returned inside [`crate::Action::Ignored`] so callers can tell accepted
//! from ignored input. [`Error`] covers failures of the surrounding system.

use crate::chord::{SlotId, MAX_CHORD_LEN};
use crate::keys::KeyIndex;
use thiserror::Error;

/// Recoverable, local reasons an input was not applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Input matches no note key or control")]
    UnknownInput,

    #[error("Slot {0} is inactive")]
    InactiveSlotSelected(SlotId),

    #[error("Chord already holds {} notes", MAX_CHORD_LEN)]
    ChordFull,

    #[error("Slot {0} is a built-in chord and cannot be overwritten")]
    ImmutableSlot(SlotId),

    #[error("Key {0} is already held")]
    KeyAlreadyHeld(KeyIndex),

    #[error("Key {0} is not held")]
    KeyNotHeld(KeyIndex),

    #[error("Slot {0} holds an empty chord")]
    EmptyChord(SlotId),

    #[error("A chord edit is already in progress")]
    EditInProgress,

    #[error("No chord edit in progress")]
    NotEditing,
}

/// Error type for chordkey-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Invalid chord slot: {0}. Must be below 10")]
    InvalidSlot(usize),

    #[error("Invalid key index: {0}. Must be below 17")]
    InvalidKey(usize),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Audio backend unavailable: {0}")]
    AudioBackendUnavailable(String),

    #[cfg(feature = "audio")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "audio")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "audio")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "audio")]
    #[error("Failed to enumerate devices")]
    DevicesError(#[from] cpal::DevicesError),

    #[cfg(feature = "audio")]
    #[error("Failed to get device name")]
    DeviceNameError(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
