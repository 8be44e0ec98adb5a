// src/services/gemini_service.rs
use crate::errors::VisionRankError;
use crate::models::GeminiProfileResponse;
use crate::services::image_processor::split_data_url;
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde_json::json;
use std::time::Instant;

pub const FALLBACK_NAME: &str = "Elite Talent";
pub const FALLBACK_COUNTRY: &str = "International";
pub const FALLBACK_ABOUT: &str = "A versatile and compelling presence in the modern fashion landscape, known for a unique aesthetic and effortless poise.";
pub const FALLBACK_CATEGORY: &str = "Editorial";

const ANALYSIS_PROMPT: &str = r#"Act as a senior fashion editor. Analyze this portrait for a "Top 40 Rankings" website.
  Provide:
  1. "name": A unique professional stage name.
  2. "country": The model's country of origin (choose one that fits the aesthetic).
  3. "about": A 3-sentence high-fashion editorial biography (the "About her" section).
  4. "category": A primary fashion category (e.g., Haute Couture, Commercial, Swimwear).

  Return strictly as valid JSON."#;

/// Metadata used when no analysis could be obtained.
pub fn fallback_profile() -> GeminiProfileResponse {
    GeminiProfileResponse {
        name: FALLBACK_NAME.to_string(),
        country: FALLBACK_COUNTRY.to_string(),
        about: FALLBACK_ABOUT.to_string(),
        category: FALLBACK_CATEGORY.to_string(),
    }
}

/// Outcome of an analysis. Downstream code treats both variants the same;
/// the distinction exists for callers that want to know which path ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Analyzed(GeminiProfileResponse),
    Fallback(GeminiProfileResponse),
}

impl Analysis {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Analysis::Fallback(_))
    }

    pub fn into_profile_response(self) -> GeminiProfileResponse {
        match self {
            Analysis::Analyzed(r) | Analysis::Fallback(r) => r,
        }
    }
}

/// Produces descriptive metadata for a portrait. Never fails: errors are
/// folded into [`Analysis::Fallback`].
#[async_trait]
pub trait ProfileAnalyzer: Send + Sync {
    async fn analyze(&self, image: &str) -> Analysis;
}

pub struct GeminiService {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiService {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn request_profile(
        &self,
        api_key: &str,
        image: &str,
    ) -> Result<GeminiProfileResponse, VisionRankError> {
        let (mime_type, data) = split_data_url(image);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&json!({
                "contents": [{
                    "parts": [
                        { "text": ANALYSIS_PROMPT },
                        {
                            "inline_data": {
                                "mime_type": mime_type,
                                "data": data
                            }
                        }
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "country": { "type": "STRING" },
                            "about": { "type": "STRING" },
                            "category": { "type": "STRING" }
                        },
                        "required": ["name", "country", "about", "category"]
                    }
                }
            }))
            .send()
            .await
            .map_err(|e| VisionRankError::Analysis(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VisionRankError::Analysis(format!(
                "Gemini error {}: {}",
                status, error_text
            )));
        }

        let result: serde_json::Value = response.json().await.map_err(|e| {
            VisionRankError::Analysis(format!("Failed to parse Gemini response: {}", e))
        })?;

        let content = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| VisionRankError::Analysis("No text in Gemini response".to_string()))?;

        serde_json::from_str(content).map_err(|e| {
            VisionRankError::Analysis(format!("Failed to parse profile JSON: {}", e))
        })
    }
}

#[async_trait]
impl ProfileAnalyzer for GeminiService {
    async fn analyze(&self, image: &str) -> Analysis {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No Gemini API key configured, using fallback profile");
            return Analysis::Fallback(fallback_profile());
        };

        let start = Instant::now();
        match self.request_profile(api_key, image).await {
            Ok(profile) => {
                debug!(
                    "Gemini analysis with {} took {}ms",
                    self.model,
                    start.elapsed().as_millis()
                );
                Analysis::Analyzed(profile)
            }
            Err(e) => {
                error!("Gemini analysis error: {}", e);
                warn!("Falling back to default profile metadata");
                Analysis::Fallback(fallback_profile())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-test";
    const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn service(api_key: Option<&str>, server: &MockServer) -> GeminiService {
        GeminiService::new(
            api_key.map(str::to_string),
            MODEL.to_string(),
            server.uri(),
        )
    }

    fn candidate(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn missing_key_returns_fixed_fallback() {
        let server = MockServer::start().await;
        let gemini = service(None, &server);

        let analysis = gemini.analyze("data:image/jpeg;base64,AAAA").await;

        assert_eq!(
            analysis,
            Analysis::Fallback(GeminiProfileResponse {
                name: "Elite Talent".to_string(),
                country: "International".to_string(),
                about: FALLBACK_ABOUT.to_string(),
                category: "Editorial".to_string(),
            })
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        let server = MockServer::start().await;
        assert!(service(Some("  "), &server).analyze("AAAA").await.is_fallback());
    }

    #[tokio::test]
    async fn parses_structured_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(json!({
                "contents": [{
                    "parts": [
                        { "text": ANALYSIS_PROMPT },
                        { "inline_data": { "mime_type": "image/png", "data": "QUJD" } }
                    ]
                }],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(
                r#"{"name":"Lina Vos","country":"Netherlands","about":"Sharp.","category":"Commercial"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = service(Some("secret"), &server)
            .analyze("data:image/png;base64,QUJD")
            .await;

        assert_eq!(
            analysis,
            Analysis::Analyzed(GeminiProfileResponse {
                name: "Lina Vos".to_string(),
                country: "Netherlands".to_string(),
                about: "Sharp.".to_string(),
                category: "Commercial".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = service(Some("secret"), &server).analyze("AAAA").await;

        assert_eq!(analysis, Analysis::Fallback(fallback_profile()));
    }

    #[tokio::test]
    async fn schema_violation_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate(r#"{"name":"Only"}"#)),
            )
            .mount(&server)
            .await;

        let analysis = service(Some("secret"), &server).analyze("AAAA").await;

        assert!(analysis.is_fallback());
        assert_eq!(analysis.into_profile_response(), fallback_profile());
    }

    #[tokio::test]
    async fn empty_candidates_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        assert!(service(Some("secret"), &server).analyze("AAAA").await.is_fallback());
    }
}
