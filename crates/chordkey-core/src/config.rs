//! Controller configuration.

use crate::error::{Error, Result};
use crate::keymap::KeyMap;
use crate::transition::DEFAULT_QUEUE_CAPACITY;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::ChordController`] and its emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub keymap: KeyMap,
    /// MIDI note of key 0 under a unison chord.
    pub base_note: i32,
    /// Note-On velocity, 0..=127.
    pub volume: u8,
    /// MIDI channel, 0..=15.
    pub channel: u8,
    /// Note-Off velocity. `None` uses the current volume.
    pub release_velocity: Option<u8>,
    /// Capacity of the transition ring between the two contexts.
    pub queue_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            base_note: 60,
            volume: 127,
            channel: 0,
            release_velocity: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.volume > 127 {
            return Err(Error::InvalidConfig(format!(
                "volume {} out of range (0-127)",
                self.volume
            )));
        }
        if self.channel > 15 {
            return Err(Error::InvalidConfig(format!(
                "channel {} out of range (0-15)",
                self.channel
            )));
        }
        if let Some(velocity) = self.release_velocity.filter(|v| *v > 127) {
            return Err(Error::InvalidConfig(format!(
                "release velocity {velocity} out of range (0-127)"
            )));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        self.keymap.validate()
    }
}
