//! CPAL output stream that clocks the emitter.

mod core;

pub use self::core::{AudioEngine, AudioEngineConfig};
