//! Gemini API client for marketing image analysis.
//!
//! Sends the image inline with the extraction instruction and a strict
//! response schema, then parses the returned JSON into an `AnalysisOutcome`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{parse_analysis, schema, AnalysisBackend, AnalysisOutcome};
use crate::error::{LreError, LreResult};
use crate::ingest::UploadedImage;

/// Default Gemini API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-3.1-pro-preview";

/// Everything the client needs. Built by the caller; nothing is read from the
/// environment here.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// `None` waits for as long as the transport allows.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Config with the default model and endpoint.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Variant order matters for untagged decoding.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(Value),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    /// Create a new client from its configuration.
    pub fn new(config: GeminiConfig) -> LreResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LreError::config("Gemini API key is empty"));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config: GeminiConfig {
                api_base: config.api_base.trim_end_matches('/').to_string(),
                ..config
            },
            client: builder.build()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    /// Send the image and return the raw text of the first candidate.
    pub async fn generate(&self, image: &UploadedImage) -> LreResult<String> {
        let request = build_request(image);

        debug!(model = %self.config.model, mime_type = %image.mime_type, "Calling Gemini API");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LreError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = response_text(body).ok_or(LreError::EmptyResponse)?;
        debug!(len = text.len(), "Gemini response received");
        Ok(text)
    }
}

#[async_trait]
impl AnalysisBackend for GeminiClient {
    async fn analyze(&self, image: &UploadedImage) -> LreResult<AnalysisOutcome> {
        let text = self.generate(image).await?;
        parse_analysis(&text)
    }
}

fn build_request(image: &UploadedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text {
                    text: schema::INSTRUCTION.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema::response_schema(),
        },
    }
}

/// Concatenated text parts of the first candidate, if any.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text),
            _ => None,
        })
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::{Json, Router};
    use crate::test_support::SAMPLE;

    const MODEL: &str = "test-model";
    const KEY: &str = "test-key";

    /// Serve `router` on an ephemeral port and return a client pointed at it.
    async fn client_for(router: Router) -> GeminiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let mut config = GeminiConfig::new(KEY);
        config.model = MODEL.to_string();
        config.api_base = format!("http://{}/v1beta", addr);
        GeminiClient::new(config).unwrap()
    }

    fn sample_image() -> UploadedImage {
        UploadedImage::from_bytes(b"\x89PNG", "image/png").unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let image = sample_image();
        let body = serde_json::to_value(build_request(&image)).unwrap();

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], image.data.as_str());
        assert_eq!(parts[1]["text"], schema::INSTRUCTION);

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"], schema::response_schema());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response_text(response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_missing() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(response_text(empty).is_none());

        let no_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response_text(no_content).is_none());

        let blank: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert!(response_text(blank).is_none());
    }

    #[test]
    fn test_client_requires_key() {
        assert!(matches!(
            GeminiClient::new(GeminiConfig::new("  ")),
            Err(LreError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let mut config = GeminiConfig::new("key");
        config.api_base = "http://localhost:9999/v1beta/".to_string();
        config.model = "gemini-test".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }

    #[tokio::test]
    async fn test_generate_sends_key_and_parses_candidate() {
        let router = Router::new().fallback(
            |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
                if uri.path() != "/v1beta/models/test-model:generateContent" {
                    return (StatusCode::NOT_FOUND, uri.path().to_string()).into_response();
                }
                if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(KEY) {
                    return (StatusCode::UNAUTHORIZED, "bad key").into_response();
                }
                if body["generationConfig"]["responseMimeType"] != "application/json"
                    || body["contents"][0]["parts"][0]["inlineData"]["mimeType"] != "image/png"
                {
                    return (StatusCode::BAD_REQUEST, "bad body").into_response();
                }
                Json(serde_json::json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": SAMPLE }] } }]
                }))
                .into_response()
            },
        );
        let client = client_for(router).await;

        let outcome = client.analyze(&sample_image()).await.unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.result().information.headline, "Precision Redefined");
    }

    #[tokio::test]
    async fn test_generate_maps_error_status() {
        let router = Router::new().fallback(|| async {
            (StatusCode::SERVICE_UNAVAILABLE, "model overloaded")
        });
        let client = client_for(router).await;

        match client.generate(&sample_image()).await {
            Err(LreError::Service { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model overloaded");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty() {
        let router = Router::new()
            .fallback(|| async { Json(serde_json::json!({ "candidates": [] })) });
        let client = client_for(router).await;

        assert!(matches!(
            client.generate(&sample_image()).await,
            Err(LreError::EmptyResponse)
        ));
    }
}
