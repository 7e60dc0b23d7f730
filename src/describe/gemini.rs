//! Gemini text generation backend
//!
//! Calls `models/{model}:generateContent` on the Gemini REST API.
//! One request per description: no retries, no streaming.

use crate::config::{CredentialStatus, GeminiConfig};
use crate::constants::{api::GEMINI_KEY_HEADER, placeholders};
use crate::coord::Coordinates;
use crate::describe::{location_prompt, DetailError, LocationDetailService};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("geo-explorer/", env!("CARGO_PKG_VERSION"));

/// Gemini backend
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

/// `generateContent` request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// `generateContent` response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Error envelope returned on non-2xx responses
///
/// Example: `{"error": {"code": 400, "message": "API key not valid. ...",
/// "status": "INVALID_ARGUMENT", "details": [{"reason": "API_KEY_INVALID"}]}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, or None when it is blank
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

impl GeminiBackend {
    /// Create a backend from the `[gemini]` config section
    ///
    /// A missing or placeholder key is accepted here; every fetch then fails
    /// with [`DetailError::ConfigurationMissing`] without touching the network.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let api_key = match CredentialStatus::check(&config.api_key, placeholders::GEMINI_API_KEY) {
            CredentialStatus::Configured => Some(config.api_key.trim().to_string()),
            _ => None,
        };

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Model this backend talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> std::result::Result<String, DetailError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(GEMINI_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DetailError::classify(&format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DetailError::classify(&format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(DetailError::classify(&describe_api_error(status, &text)));
        }

        parse_generate_response(&text)
    }
}

/// Extract the description from a successful response body
fn parse_generate_response(body: &str) -> std::result::Result<String, DetailError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| DetailError::Unknown(format!("Failed to parse Gemini response: {}", e)))?;

    parsed.into_text().ok_or(DetailError::EmptyResponse)
}

/// Fold an error response into one line suitable for classification
fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => {
            let mut description = format!("{}: {}", status, error.message);
            if let Some(code) = error.status {
                description.push_str(&format!(" ({})", code));
            }
            let reasons: Vec<String> = error.details.into_iter().filter_map(|d| d.reason).collect();
            if !reasons.is_empty() {
                description.push_str(&format!(" [{}]", reasons.join(", ")));
            }
            description
        }
        Err(_) if body.trim().is_empty() => format!("Gemini API returned status: {}", status),
        Err(_) => format!("Gemini API returned status: {}: {}", status, body.trim()),
    }
}

impl LocationDetailService for GeminiBackend {
    async fn fetch_description(&self, coords: Coordinates) -> std::result::Result<String, DetailError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Gemini API key is not configured; refusing to call the API");
            return Err(DetailError::ConfigurationMissing);
        };

        debug!(%coords, model = %self.model, "requesting location description");
        let prompt = location_prompt(coords);

        match self.generate(api_key, &prompt).await {
            Ok(text) => {
                debug!(%coords, chars = text.len(), "location description received");
                Ok(text)
            }
            Err(e) => {
                warn!(%coords, kind = ?e.kind(), "error fetching location details from Gemini: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::DetailErrorKind;

    fn config_with_key(key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: key.to_string(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_backend_creation() {
        let backend = GeminiBackend::from_config(&config_with_key("abc")).unwrap();
        assert!(backend.is_configured());
        assert_eq!(backend.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_placeholder_key_not_configured() {
        let backend = GeminiBackend::from_config(&config_with_key("YOUR_ACTUAL_GEMINI_API_KEY")).unwrap();
        assert!(!backend.is_configured());
    }

    #[test]
    fn test_endpoint() {
        let mut config = config_with_key("abc");
        config.base_url = "http://localhost:9000/v1beta/".to_string();
        let backend = GeminiBackend::from_config(&config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let mut config = config_with_key("");
        // Unroutable: a network attempt would surface as Unknown, not ConfigurationMissing
        config.base_url = "http://127.0.0.1:9".to_string();
        let backend = GeminiBackend::from_config(&config).unwrap();

        let err = backend
            .fetch_description(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err, DetailError::ConfigurationMissing);
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Paris is the capital of France. "},
                    {"text": "It sits on the Seine."}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(
            parse_generate_response(body).unwrap(),
            "Paris is the capital of France. It sits on the Seine."
        );
    }

    #[test]
    fn test_parse_empty_text() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#;
        assert_eq!(parse_generate_response(body).unwrap_err(), DetailError::EmptyResponse);
    }

    #[test]
    fn test_parse_no_candidates() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert_eq!(parse_generate_response(body).unwrap_err(), DetailError::EmptyResponse);
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_generate_response("<html>").unwrap_err();
        assert_eq!(err.kind(), DetailErrorKind::Unknown);
    }

    #[test]
    fn test_invalid_key_error_classified() {
        let body = r#"{"error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
        }}"#;
        let description = describe_api_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(description.contains("API_KEY_INVALID"));
        assert_eq!(DetailError::classify(&description), DetailError::AuthFailure);
    }

    #[test]
    fn test_quota_error_classified() {
        let body = r#"{"error": {
            "code": 429,
            "message": "You exceeded your current quota, please check your plan and billing details.",
            "status": "RESOURCE_EXHAUSTED"
        }}"#;
        let description = describe_api_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(DetailError::classify(&description), DetailError::QuotaExceeded);
    }

    #[test]
    fn test_unstructured_error_falls_back() {
        let description = describe_api_error(reqwest::StatusCode::BAD_GATEWAY, "upstream hiccup");
        assert!(description.contains("502"));
        let err = DetailError::classify(&description);
        assert_eq!(err.kind(), DetailErrorKind::Unknown);
        assert!(err.to_string().contains("upstream hiccup"));
    }

    /// Serve a canned `generateContent` reply on an ephemeral local port
    async fn local_gemini(status: axum::http::StatusCode, body: &'static str) -> String {
        let app = axum::Router::new().fallback(move |headers: axum::http::HeaderMap| async move {
            if headers.get(GEMINI_KEY_HEADER).map_or(true, |key| key.as_bytes() != b"abc") {
                return (axum::http::StatusCode::UNAUTHORIZED, "missing key");
            }
            (status, body)
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    async fn describe_via(base_url: String) -> std::result::Result<String, DetailError> {
        let mut config = config_with_key("abc");
        config.base_url = base_url;
        let backend = GeminiBackend::from_config(&config).unwrap();
        backend.fetch_description(Coordinates::new(48.8566, 2.3522)).await
    }

    #[tokio::test]
    async fn test_quota_response_over_http() {
        let base_url = local_gemini(
            axum::http::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED"}}"#,
        )
        .await;

        assert_eq!(describe_via(base_url).await.unwrap_err(), DetailError::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_invalid_key_response_over_http() {
        let base_url = local_gemini(
            axum::http::StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#,
        )
        .await;

        assert_eq!(describe_via(base_url).await.unwrap_err(), DetailError::AuthFailure);
    }

    #[tokio::test]
    async fn test_success_response_over_http() {
        let base_url = local_gemini(
            axum::http::StatusCode::OK,
            r#"{"candidates": [{"content": {"parts": [{"text": "Paris is the capital of France."}]}}]}"#,
        )
        .await;

        assert_eq!(describe_via(base_url).await.unwrap(), "Paris is the capital of France.");
    }

    #[tokio::test]
    async fn test_connection_refused_is_unknown() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = describe_via(format!("http://{}/v1beta", addr)).await.unwrap_err();
        assert_eq!(err.kind(), DetailErrorKind::Unknown);
        assert!(err.to_string().contains("Gemini request failed"));
    }

    // Calls the real API; needs GEMINI_API_KEY and network access
    #[tokio::test]
    #[ignore = "Requires network access and a Gemini API key"]
    async fn test_gemini_live() {
        let config = crate::config::Config::default().with_env_overrides();
        let backend = GeminiBackend::from_config(&config.gemini).unwrap();
        let text = backend
            .fetch_description(Coordinates::new(48.8566, 2.3522))
            .await
            .unwrap();
        assert!(!text.is_empty());
    }
}
