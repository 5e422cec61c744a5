use serde::{Deserialize, Serialize};

/// Storage key for the sound toggle.
pub const SOUND_KEY: &str = "sound";
/// Storage key for the language-direction swap toggle.
pub const DIRECTION_SWAP_KEY: &str = "direction_swap";

/// Per-device player preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub sound_enabled: bool,
    pub direction_swapped: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            direction_swapped: false,
        }
    }
}

impl Preferences {
    #[must_use]
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_direction_swapped(mut self, swapped: bool) -> Self {
        self.direction_swapped = swapped;
        self
    }
}
