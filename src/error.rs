//! Centralized error type for the chordkey umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] chordkey_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] chordkey_midi::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<chordkey_core::Rejection> for Error {
    fn from(rejection: chordkey_core::Rejection) -> Self {
        Error::Core(rejection.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
