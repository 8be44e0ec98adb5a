// src/services/profile_repository.rs
use crate::errors::VisionRankError;
use crate::models::Profile;
use crate::services::kv_store::{KeyValueStore, PROFILES_KEY};
use log::{debug, error, warn};
use std::sync::Arc;

/// Reads and writes the whole profile collection as one JSON array.
pub struct ProfileRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Loads the persisted collection. A missing blob, or one that is not a
    /// JSON array, yields an empty collection. Records that fail to parse are
    /// logged and skipped. Only backend failures are returned as errors.
    pub async fn load(&self) -> Result<Vec<Profile>, VisionRankError> {
        let Some(saved) = self.kv.get(PROFILES_KEY).await? else {
            return Ok(Vec::new());
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&saved) {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to parse stored profiles: {}", e);
                return Ok(Vec::new());
            }
        };

        let total = records.len();
        let profiles: Vec<Profile> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(profile) => Some(normalize(profile)),
                Err(e) => {
                    warn!("Skipping stored profile at index {}: {}", index, e);
                    None
                }
            })
            .collect();

        debug!("Loaded {} of {} stored profiles", profiles.len(), total);
        Ok(profiles)
    }

    /// Overwrites the persisted blob with the full collection.
    pub async fn save(&self, profiles: &[Profile]) -> Result<(), VisionRankError> {
        let value = serde_json::to_string(profiles)
            .map_err(|e| VisionRankError::Serialization(e.to_string()))?;
        self.kv.set(PROFILES_KEY, &value).await
    }
}

/// Fills in `gallery_images` for records saved before galleries existed.
/// Applying it to an already normalized profile changes nothing.
pub fn normalize(mut profile: Profile) -> Profile {
    if profile.gallery_images.is_empty() && !profile.profile_image.is_empty() {
        profile.gallery_images = vec![profile.profile_image.clone()];
    }
    profile
}
