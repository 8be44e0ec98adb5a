// src/services/profile_store.rs
use crate::errors::VisionRankError;
use crate::models::{Profile, RankedProfile};
use crate::services::gemini_service::ProfileAnalyzer;
use crate::services::profile_repository::ProfileRepository;
use crate::services::ranking;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const VIEW_SEED_MAX: u64 = 20;

/// Owns the canonical profile collection. Every mutation rewrites the whole
/// persisted collection once the in-memory state is updated.
pub struct ProfileStore {
    repository: ProfileRepository,
    analyzer: Arc<dyn ProfileAnalyzer>,
    profiles: Mutex<Vec<Profile>>,
}

impl ProfileStore {
    pub async fn open(
        repository: ProfileRepository,
        analyzer: Arc<dyn ProfileAnalyzer>,
    ) -> Result<Self, VisionRankError> {
        let profiles = repository.load().await?;
        info!("Profile store opened with {} profiles", profiles.len());

        Ok(Self {
            repository,
            analyzer,
            profiles: Mutex::new(profiles),
        })
    }

    pub async fn ranked(&self) -> Vec<RankedProfile> {
        ranking::rank(&self.profiles.lock().await)
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<RankedProfile> {
        ranking::leaderboard(&self.profiles.lock().await, limit)
    }

    /// Creates a profile from uploaded images, newest first in the collection.
    /// The first image is analyzed and becomes the primary image. Returns
    /// `None` without touching state when `images` is empty.
    ///
    /// The analysis runs without holding the collection lock, so overlapping
    /// uploads all land; their relative order follows completion order.
    pub async fn add_profile(
        &self,
        images: Vec<String>,
    ) -> Result<Option<Profile>, VisionRankError> {
        let Some(primary) = images.first().cloned() else {
            return Ok(None);
        };

        let analysis = self.analyzer.analyze(&primary).await;
        if analysis.is_fallback() {
            debug!("Creating profile from fallback metadata");
        }
        let metadata = analysis.into_profile_response();

        let profile = Profile {
            id: Uuid::new_v4(),
            name: metadata.name,
            country: metadata.country,
            about: metadata.about,
            category: metadata.category,
            profile_image: primary,
            gallery_images: images,
            views: fastrand::u64(0..VIEW_SEED_MAX),
            uploaded_at: chrono::Utc::now().timestamp_millis(),
        };

        let mut profiles = self.profiles.lock().await;
        profiles.insert(0, profile.clone());
        self.repository.save(&profiles).await?;

        info!("Added profile {} ({})", profile.id, profile.name);
        Ok(Some(profile))
    }

    /// Adds one view. Returns the profile with its rank after the increment,
    /// or `None` when no profile has this id.
    pub async fn record_view(&self, id: Uuid) -> Result<Option<RankedProfile>, VisionRankError> {
        let mut profiles = self.profiles.lock().await;
        if let Some(profile) = profiles.iter_mut().find(|p| p.id == id) {
            profile.views += 1;
        }
        self.repository.save(&profiles).await?;

        Ok(ranking::rank(&profiles)
            .into_iter()
            .find(|r| r.profile.id == id))
    }

    /// Appends images to a profile's gallery. An unset primary image becomes
    /// the first appended one. `None` when the id is unknown or `images` is
    /// empty.
    pub async fn append_images(
        &self,
        id: Uuid,
        images: Vec<String>,
    ) -> Result<Option<Profile>, VisionRankError> {
        if images.is_empty() {
            return Ok(None);
        }

        let mut profiles = self.profiles.lock().await;
        let Some(profile) = profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if profile.profile_image.is_empty() {
            profile.profile_image = images[0].clone();
        }
        profile.gallery_images.extend(images);
        let updated = profile.clone();

        self.repository.save(&profiles).await?;

        debug!(
            "Profile {} gallery now has {} images",
            id,
            updated.gallery_images.len()
        );
        Ok(Some(updated))
    }

    /// Removes a profile. Deleting an unknown id is a no-op. Returns whether
    /// a profile was removed.
    pub async fn delete_profile(&self, id: Uuid) -> Result<bool, VisionRankError> {
        let mut profiles = self.profiles.lock().await;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        let removed = profiles.len() != before;
        self.repository.save(&profiles).await?;

        if removed {
            info!("Deleted profile {}", id);
        }
        Ok(removed)
    }
}
