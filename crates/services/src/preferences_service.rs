use std::sync::Arc;

use storage::repository::PreferenceRepository;
use tracing::warn;
use wordbottle_core::model::{DIRECTION_SWAP_KEY, Preferences, SOUND_KEY};

use crate::error::PreferencesError;

/// Loads and saves player preferences through a key-value store.
///
/// Each flag is stored as a JSON boolean under its own key.
#[derive(Clone)]
pub struct PreferencesService {
    repo: Arc<dyn PreferenceRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted preferences. Missing or unreadable values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` on storage failures.
    pub async fn load(&self) -> Result<Preferences, PreferencesError> {
        let defaults = Preferences::default();
        Ok(Preferences {
            sound_enabled: self.read_flag(SOUND_KEY, defaults.sound_enabled).await?,
            direction_swapped: self
                .read_flag(DIRECTION_SWAP_KEY, defaults.direction_swapped)
                .await?,
        })
    }

    /// Persist every preference.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if persistence fails.
    pub async fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        self.write_flag(SOUND_KEY, prefs.sound_enabled).await?;
        self.write_flag(DIRECTION_SWAP_KEY, prefs.direction_swapped)
            .await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError` if persistence fails.
    pub async fn set_sound(&self, enabled: bool) -> Result<(), PreferencesError> {
        self.write_flag(SOUND_KEY, enabled).await
    }

    /// # Errors
    ///
    /// Returns `PreferencesError` if persistence fails.
    pub async fn set_direction_swap(&self, swapped: bool) -> Result<(), PreferencesError> {
        self.write_flag(DIRECTION_SWAP_KEY, swapped).await
    }

    /// Flip the sound flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` on storage failures.
    pub async fn toggle_sound(&self) -> Result<bool, PreferencesError> {
        let next = !self.load().await?.sound_enabled;
        self.set_sound(next).await?;
        Ok(next)
    }

    /// Flip the direction-swap flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` on storage failures.
    pub async fn toggle_direction_swap(&self) -> Result<bool, PreferencesError> {
        let next = !self.load().await?.direction_swapped;
        self.set_direction_swap(next).await?;
        Ok(next)
    }

    async fn read_flag(&self, key: &str, default: bool) -> Result<bool, PreferencesError> {
        let Some(raw) = self.repo.get(key).await? else {
            return Ok(default);
        };
        match serde_json::from_str::<bool>(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, value = %raw, error = %err, "ignoring unreadable preference");
                Ok(default)
            }
        }
    }

    async fn write_flag(&self, key: &str, value: bool) -> Result<(), PreferencesError> {
        let encoded = serde_json::to_string(&value)?;
        self.repo.set(key, &encoded).await?;
        Ok(())
    }
}
