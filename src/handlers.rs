// src/handlers.rs
use crate::{AppState, errors::VisionRankError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use log::debug;
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

fn require_admin(data: &AppState, action: &str) -> Result<(), VisionRankError> {
    if data.admin_session.is_admin() {
        Ok(())
    } else {
        Err(VisionRankError::Forbidden(format!(
            "{} requires curator mode",
            action
        )))
    }
}

/// Reads every multipart field as an image and returns them as data URLs,
/// in upload order.
async fn read_images(mut payload: Multipart, data: &AppState) -> Result<Vec<String>, Error> {
    let mut images = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let mut image_data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            image_data.extend_from_slice(&chunk);
        }

        if image_data.is_empty() {
            continue;
        }

        images.push(data.image_processor.prepare_upload(&image_data)?);
    }

    if images.is_empty() {
        return Err(VisionRankError::Validation("No images provided".to_string()).into());
    }

    debug!("Read {} images from upload", images.len());
    Ok(images)
}

pub async fn list_profiles(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(data.profile_store.ranked().await))
}

pub async fn leaderboard(
    data: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, Error> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    Ok(HttpResponse::Ok().json(data.profile_store.leaderboard(limit).await))
}

pub async fn upload_profile(
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&data, "Uploading")?;

    let images = read_images(payload, &data).await?;
    let profile = data
        .profile_store
        .add_profile(images)
        .await?
        .ok_or_else(|| VisionRankError::Validation("No images provided".to_string()))?;

    Ok(HttpResponse::Created().json(&profile))
}

pub async fn view_profile(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    let profile = data
        .profile_store
        .record_view(id)
        .await?
        .ok_or_else(|| VisionRankError::NotFound(format!("Profile {}", id)))?;

    Ok(HttpResponse::Ok().json(&profile))
}

pub async fn add_images(
    path: web::Path<Uuid>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&data, "Adding images")?;
    let id = path.into_inner();

    let images = read_images(payload, &data).await?;
    let profile = data
        .profile_store
        .append_images(id, images)
        .await?
        .ok_or_else(|| VisionRankError::NotFound(format!("Profile {}", id)))?;

    Ok(HttpResponse::Ok().json(&profile))
}

pub async fn delete_profile(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&data, "Deleting")?;

    data.profile_store.delete_profile(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn session_status(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(SessionStatus {
        is_admin: data.admin_session.is_admin(),
    })
}

pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, Error> {
    let is_admin = data.admin_session.login(&body.password).await?;
    Ok(HttpResponse::Ok().json(SessionStatus { is_admin }))
}

pub async fn logout(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    data.admin_session.logout().await?;
    Ok(HttpResponse::Ok().json(SessionStatus { is_admin: false }))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "visionrank",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
