// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A ranked talent record. Field names on the wire follow the persisted
/// camelCase layout so previously stored collections keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub about: String,
    pub category: String,
    /// Primary display image as a data URL or URI. Empty means unset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery_images: Vec<String>,
    pub views: u64,
    /// Unix milliseconds.
    pub uploaded_at: i64,
}

/// Older records may carry `null` where a value is now expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A profile annotated with its 1-based position in the current ordering.
/// Produced by the ranking engine only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiProfileResponse {
    pub name: String,
    pub country: String,
    pub about: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_admin: bool,
}
