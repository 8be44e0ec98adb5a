// src/lib.rs
use actix_web::web;
use log::{info, warn};
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use crate::config::Config;
use crate::errors::VisionRankError;
use crate::services::{
    AdminSession, GeminiService, ImageProcessor, KeyValueStore, MemoryStore, ProfileAnalyzer,
    ProfileRepository, ProfileStore, RedisStore,
};

#[derive(Clone)]
pub struct AppState {
    pub profile_store: Arc<ProfileStore>,
    pub admin_session: Arc<AdminSession>,
    pub image_processor: Arc<ImageProcessor>,
}

impl AppState {
    /// Builds the session-wide services from configuration.
    pub async fn from_config(config: &Config) -> Result<Self, VisionRankError> {
        let kv: Arc<dyn KeyValueStore> = match &config.redis_url {
            Some(url) => {
                info!("Persisting state in Redis");
                Arc::new(RedisStore::new(url).await?)
            }
            None => {
                warn!("REDIS_URL not set, state will not outlive the process");
                Arc::new(MemoryStore::new())
            }
        };

        if config.api_key.is_none() {
            warn!("API_KEY not set, profiles will use fallback metadata");
        }
        let analyzer: Arc<dyn ProfileAnalyzer> = Arc::new(GeminiService::new(
            config.api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        ));

        Self::with_services(
            kv,
            analyzer,
            config.admin_password.clone(),
            config.max_image_dimension,
        )
        .await
    }

    pub async fn with_services(
        kv: Arc<dyn KeyValueStore>,
        analyzer: Arc<dyn ProfileAnalyzer>,
        admin_password: String,
        max_image_dimension: u32,
    ) -> Result<Self, VisionRankError> {
        let profile_store =
            ProfileStore::open(ProfileRepository::new(kv.clone()), analyzer).await?;
        let admin_session = AdminSession::restore(kv, admin_password).await?;

        Ok(Self {
            profile_store: Arc::new(profile_store),
            admin_session: Arc::new(admin_session),
            image_processor: Arc::new(ImageProcessor::new(max_image_dimension)),
        })
    }
}

/// Registers all routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use crate::handlers::*;

    cfg.service(
        web::scope("/api/v1")
            .route("/profiles", web::get().to(list_profiles))
            .route("/profiles", web::post().to(upload_profile))
            .route("/profiles/{id}", web::delete().to(delete_profile))
            .route("/profiles/{id}/view", web::post().to(view_profile))
            .route("/profiles/{id}/images", web::post().to(add_images))
            .route("/leaderboard", web::get().to(leaderboard))
            .route("/session", web::get().to(session_status))
            .route("/session/login", web::post().to(login))
            .route("/session/logout", web::post().to(logout)),
    )
    .route("/health", web::get().to(health_check));
}
